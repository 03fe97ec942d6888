/// Genomic-to-pixel linear scaling.
pub mod linear;
