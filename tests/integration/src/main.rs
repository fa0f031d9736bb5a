mod helpers;

mod data_types;
mod keys;
mod reclamation;
mod scan;

fn main() {}
