pub mod entity;
pub mod food;
pub mod grid;
pub mod rules;
