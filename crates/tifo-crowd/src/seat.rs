//! Seat records.
//!
//! Each crowd version has its own fixed-size seat layout. The records are
//! read and written as packed structs, so every byte (including padding and
//! fields whose meaning is unknown) round-trips unchanged.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Seat position.
#[derive(Debug, Clone, Copy, Default, PartialEq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(C, packed)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Seat record of version `0x103`.
#[derive(Debug, Clone, Copy, Default, PartialEq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(C, packed)]
pub struct Seat0103 {
    pub position: Vector3,
    /// Rotation around the vertical axis.
    pub rotation: f32,
    /// RGB seat color.
    pub seat_color: [u8; 3],
    pub section: u8,
    pub tier: u8,
    pub attendance: u8,
    pub influence_area: u8,
    pub unused: u8,
    pub shade: [f32; 4],
    pub anim_groups: u8,
    pub num_accessories: u8,
}

/// Seat record of version `0x104`.
#[derive(Debug, Clone, Copy, Default, PartialEq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(C, packed)]
pub struct Seat0104 {
    pub position: Vector3,
    pub rotation: f32,
    pub seat_color: [u8; 3],
    pub section_0: u8,
    pub unknown_1: u8,
    pub unknown_2: u8,
    pub unknown_3: u8,
    pub unknown_4: u8,
    pub attendance: u8,
    pub unknown_5: [f32; 4],
}

/// Seat record of version `0x105`.
#[derive(Debug, Clone, Copy, Default, PartialEq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(C, packed)]
pub struct Seat0105 {
    pub position: Vector3,
    pub rotation: f32,
    pub seat_color: [u8; 3],
    pub section_0: u8,
    pub section_1: u8,
    pub tier: u8,
    pub attendance: u8,
    pub no_chair: u8,
    /// RGB color of the card held up during card displays.
    pub card_colors: [u8; 3],
    pub crowd_pattern: u8,
    pub pad: [u8; 4],
}

const _: () = assert!(std::mem::size_of::<Vector3>() == 12);
const _: () = assert!(std::mem::size_of::<Seat0103>() == 42);
const _: () = assert!(std::mem::size_of::<Seat0104>() == 41);
const _: () = assert!(std::mem::size_of::<Seat0105>() == 32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat0105_field_offsets() {
        let seat = Seat0105 {
            position: Vector3::new(1.0, 2.0, 3.0),
            rotation: 0.5,
            seat_color: [10, 20, 30],
            section_0: 1,
            section_1: 2,
            tier: 3,
            attendance: 4,
            no_chair: 5,
            card_colors: [6, 7, 8],
            crowd_pattern: 9,
            pad: [0xAA; 4],
        };
        let bytes = seat.as_bytes();

        assert_eq!(&bytes[12..16], &0.5f32.to_le_bytes());
        assert_eq!(&bytes[16..19], &[10, 20, 30]);
        assert_eq!(&bytes[24..28], &[6, 7, 8, 9]);
        assert_eq!(&bytes[28..], &[0xAA; 4]);
    }

    #[test]
    fn test_seat0103_from_bytes() {
        let mut bytes = [0u8; 42];
        bytes[16..19].copy_from_slice(&[1, 2, 3]);
        bytes[19] = 7;
        bytes[24..28].copy_from_slice(&1.5f32.to_le_bytes());
        bytes[40] = 2;
        bytes[41] = 9;

        let seat = Seat0103::read_from_bytes(&bytes).unwrap();
        assert_eq!(seat.seat_color, [1, 2, 3]);
        assert_eq!(seat.section, 7);
        assert_eq!({ seat.shade }[0], 1.5);
        assert_eq!(seat.anim_groups, 2);
        assert_eq!(seat.num_accessories, 9);
    }
}
