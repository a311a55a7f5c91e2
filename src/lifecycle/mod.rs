//! Spawn, animate, expire and recycle procedural objects.
//!
//! [`LifecycleManager`] owns the live set and the handles of the drawables
//! that represent it. The scene renderer is never stored: every operation that
//! touches drawables takes it as an argument, so the caller stays the owner of
//! the scene.

use std::time::SystemTime;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

use crate::{
    error::{Error, Result},
    scene::{Frame, SceneRenderer},
};

mod factory;
mod object;
mod timer;

pub use factory::{Factory, Range3, SpawnConfig};
pub use object::{Axis, Crossing, Expiry, LiveObject, Motion, ObjectId, ObjectSpec};
pub use timer::SpawnTimer;

/// What happens to the population when an object expires.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OnExpire {
    Drop,
    /// Spawn one replacement per expired object, holding the population
    /// constant.
    Recycle,
}

/// Summary of one `advance` pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Tick {
    pub advanced: usize,
    pub expired: usize,
    pub respawned: usize,
}

/// Seed from the environment when `VELVET_COMET_SEED` is set, otherwise from
/// the wall clock.
pub fn seed_from_env() -> u64 {
    if let Some(seed) = std::env::var("VELVET_COMET_SEED")
        .ok()
        .and_then(|s| s.trim().parse().ok())
    {
        return seed;
    }
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[derive(Debug)]
pub struct LifecycleManager<H> {
    live: Vec<LiveObject<H>>,
    timer: SpawnTimer,
    on_expire: OnExpire,
    rng: Pcg64Mcg,
    clock: f32,
    next_id: u64,
    spawned_total: u64,
    released_total: u64,
}

impl<H: Copy + Eq + std::fmt::Debug> LifecycleManager<H> {
    pub fn new(on_expire: OnExpire, rng: Pcg64Mcg) -> Self {
        Self {
            live: Vec::new(),
            timer: SpawnTimer::new(),
            on_expire,
            rng,
            clock: 0.,
            next_id: 0,
            spawned_total: 0,
            released_total: 0,
        }
    }

    pub fn seeded(on_expire: OnExpire, seed: u64) -> Self {
        info!("Seeded RNG with {}", seed);
        Self::new(on_expire, Pcg64Mcg::seed_from_u64(seed))
    }

    pub fn live(&self) -> &[LiveObject<H>] {
        &self.live
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn timer(&self) -> &SpawnTimer {
        &self.timer
    }

    pub fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    pub fn released_total(&self) -> u64 {
        self.released_total
    }

    /// Builds `count` objects with `factory`, registers a drawable for each
    /// and appends them to the live set.
    pub fn spawn<R, F>(&mut self, renderer: &mut R, factory: &mut F, count: usize) -> Result<usize>
    where
        R: SceneRenderer<Handle = H>,
        F: Factory + ?Sized,
    {
        for _ in 0..count {
            let spec = factory.build(&mut self.rng, self.clock)?;
            spec.validate()?;

            let handle = renderer.register_drawable(&spec.visual)?;
            let id = ObjectId(self.next_id);
            self.next_id += 1;
            self.spawned_total += 1;

            self.live.push(LiveObject {
                id,
                handle,
                transform: spec.transform,
                motion: spec.motion,
                expiry: spec.expiry,
                spawn_time: self.clock,
                expired: false,
            });
            debug!("Spawned {:?} as {:?}", id, handle);

            // Tracked before the transform goes out, so a failure here still
            // leaves the drawable reachable by teardown.
            renderer.set_transform(handle, &spec.transform)?;
        }
        Ok(count)
    }

    /// Moves every object that is live at the start of the tick exactly once,
    /// then releases the ones whose expiry policy is met. With
    /// [`OnExpire::Recycle`] each released object is replaced; replacements
    /// are first moved on the next tick.
    pub fn advance<R, F>(&mut self, renderer: &mut R, factory: &mut F, frame: Frame) -> Result<Tick>
    where
        R: SceneRenderer<Handle = H>,
        F: Factory + ?Sized,
    {
        self.clock = frame.time;

        let mut advanced = 0;
        for object in self.live.iter_mut().filter(|o| !o.expired) {
            let age = object.age(frame.time);
            object.motion.apply(&mut object.transform, frame.time, age);
            renderer.set_transform(object.handle, &object.transform)?;
            object.expired = object.expiry.is_expired(&object.transform, age);
            advanced += 1;
        }

        let expired = self.release_where(renderer, |o| o.expired)?;
        let respawned = match self.on_expire {
            OnExpire::Drop => 0,
            OnExpire::Recycle => self.spawn(renderer, factory, expired)?,
        };

        Ok(Tick {
            advanced,
            expired,
            respawned,
        })
    }

    /// Adds `delta` to the spawn accumulator and spawns `count` objects once it
    /// reaches `interval`.
    pub fn maybe_spawn<R, F>(
        &mut self,
        renderer: &mut R,
        factory: &mut F,
        delta: f32,
        interval: f32,
        count: usize,
    ) -> Result<usize>
    where
        R: SceneRenderer<Handle = H>,
        F: Factory + ?Sized,
    {
        if self.timer.tick(delta, interval)? {
            self.spawn(renderer, factory, count)
        } else {
            Ok(0)
        }
    }

    /// Releases every remaining drawable and clears the live set. Calling it
    /// again releases nothing. The clock restarts at zero, so objects spawned
    /// after a reload are stamped against the new session's frame times.
    pub fn teardown<R>(&mut self, renderer: &mut R) -> Result<usize>
    where
        R: SceneRenderer<Handle = H>,
    {
        let released = self.release_where(renderer, |_| true);
        self.timer.reset();
        self.clock = 0.;
        let released = released?;
        if released > 0 {
            info!("Tore down {} live objects", released);
        }
        Ok(released)
    }

    /// Order-preserving removal. Each matching object is unregistered and
    /// dropped in the same step; after the first failure the remaining objects
    /// are kept so their handles are not lost.
    fn release_where<R, P>(&mut self, renderer: &mut R, mut predicate: P) -> Result<usize>
    where
        R: SceneRenderer<Handle = H>,
        P: FnMut(&LiveObject<H>) -> bool,
    {
        let mut released = 0;
        let mut failure: Option<Error> = None;

        self.live.retain(|object| {
            if failure.is_some() || !predicate(object) {
                return true;
            }
            match renderer.unregister_drawable(object.handle) {
                Ok(()) => {
                    debug!("Released {:?} ({:?})", object.id, object.handle);
                    released += 1;
                    false
                }
                Err(err) => {
                    failure = Some(err);
                    true
                }
            }
        });

        self.released_total += released as u64;
        match failure {
            Some(err) => Err(err),
            None => Ok(released),
        }
    }
}

impl<H> Drop for LifecycleManager<H> {
    fn drop(&mut self) {
        if !self.live.is_empty() {
            warn!(
                "Lifecycle manager dropped with {} drawables still registered",
                self.live.len()
            );
        }
    }
}
