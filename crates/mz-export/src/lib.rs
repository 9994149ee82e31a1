/// MZM3 layer serialization for image2mzm.
pub mod mzm;
