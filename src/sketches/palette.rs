//! A few five-colour palettes from the "nice color palettes" collection.

use glam::Vec3;
use rand::{seq::SliceRandom, RngCore};

use crate::entity::hex_color;

pub type Palette = [u32; 5];

pub static PALETTES: [Palette; 6] = [
    [0x69d2e7, 0xa7dbd8, 0xe0e4cc, 0xf38630, 0xfa6900],
    [0xfe4365, 0xfc9d9a, 0xf9cdad, 0xc8c8a9, 0x83af9b],
    [0xecd078, 0xd95b43, 0xc02942, 0x542437, 0x53777a],
    [0x556270, 0x4ecdc4, 0xc7f464, 0xff6b6b, 0xc44d58],
    [0x774f38, 0xe08e79, 0xf1d4af, 0xece5ce, 0xc5e0dc],
    [0xe8ddcb, 0xcdb380, 0x036564, 0x033649, 0x031634],
];

pub fn pick_palette(rng: &mut dyn RngCore) -> &'static Palette {
    PALETTES.choose(rng).unwrap_or(&PALETTES[0])
}

pub fn pick_color(palette: &Palette, rng: &mut dyn RngCore) -> Vec3 {
    hex_color(*palette.choose(rng).unwrap_or(&palette[0]))
}
