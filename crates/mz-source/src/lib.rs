/// Image sources for image2mzm: decoding and exact-geometry resizing.

pub mod image;
pub mod resize;
