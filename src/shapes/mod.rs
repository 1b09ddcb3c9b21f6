// Copyright @yucwang 2023

pub mod cylinder;
pub mod sphere;
pub mod triangle;
