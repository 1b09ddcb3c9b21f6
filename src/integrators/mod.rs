// Copyright @yucwang 2026

pub mod common;
pub mod direct;
pub mod light;
pub mod mis;
pub mod path;
