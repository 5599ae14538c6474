pub mod nextrip;
