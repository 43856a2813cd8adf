//! Named regions of MediaPipe's [Face Mesh] landmark topology.
//!
//! Indices refer to the 468-point mesh. Lip and eye contours are listed in drawing order, so
//! they can be filled as polygons directly.
//!
//! [Face Mesh]: https://google.github.io/mediapipe/solutions/face_mesh.html

/// Number of landmarks in the face mesh.
pub const NUM_LANDMARKS: usize = 468;

/// A named, fixed set of landmark indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub name: &'static str,
    pub indices: &'static [usize],
}

pub const LIPS_OUTER: Region = Region {
    name: "lips_outer",
    indices: &[
        61, 146, 91, 181, 84, 17, 314, 405, 321, 375, 291, 308, 402, 317, 14, 87, 178, 88, 95, 78,
    ],
};

pub const LIPS_INNER: Region = Region {
    name: "lips_inner",
    indices: &[
        78, 191, 80, 81, 82, 13, 312, 311, 310, 415, 308, 324, 318, 402, 317, 14, 87, 178, 88, 95,
    ],
};

pub const LEFT_EYE: Region = Region {
    name: "left_eye",
    indices: &[
        33, 7, 163, 144, 145, 153, 154, 155, 133, 173, 157, 158, 159, 160, 161, 246,
    ],
};

pub const RIGHT_EYE: Region = Region {
    name: "right_eye",
    indices: &[
        362, 382, 381, 380, 374, 373, 390, 249, 263, 466, 388, 387, 386, 385, 384, 398,
    ],
};

pub const LEFT_EYEBROW: Region = Region {
    name: "left_eyebrow",
    indices: &[70, 63, 105, 66, 107, 55, 65, 52, 53, 46],
};

pub const RIGHT_EYEBROW: Region = Region {
    name: "right_eyebrow",
    indices: &[300, 293, 334, 296, 336, 285, 295, 282, 283, 276],
};

pub const LEFT_CHEEK: Region = Region {
    name: "left_cheek",
    indices: &[117, 118, 119, 101, 147, 205, 213, 135, 136],
};

pub const RIGHT_CHEEK: Region = Region {
    name: "right_cheek",
    indices: &[346, 347, 348, 330, 376, 425, 433, 364, 365],
};

/// All named regions.
pub const ALL: &[Region] = &[
    LIPS_OUTER,
    LIPS_INNER,
    LEFT_EYE,
    RIGHT_EYE,
    LEFT_EYEBROW,
    RIGHT_EYEBROW,
    LEFT_CHEEK,
    RIGHT_CHEEK,
];

/// Looks up a region by its name.
pub fn by_name(name: &str) -> Option<Region> {
    ALL.iter().copied().find(|r| r.name == name)
}
