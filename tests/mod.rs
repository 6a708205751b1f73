//! Test suite for notes-collab
//!
//! This module organizes all tests

pub mod common;
