//! HTTP request handlers

pub mod health;
pub mod web;
pub mod work_items;
