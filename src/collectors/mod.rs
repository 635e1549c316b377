pub mod btrfs;
pub mod runner;
