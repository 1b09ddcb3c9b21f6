// Copyright @yucwang 2026

pub mod mirror;
pub mod phong;
