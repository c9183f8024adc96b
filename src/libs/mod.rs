pub mod error;
pub mod fasta;
pub mod io;
pub mod maf;
pub mod species;
