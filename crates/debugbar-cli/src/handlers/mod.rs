pub mod clear;
pub mod logs;
pub mod serve;
pub mod tree;
