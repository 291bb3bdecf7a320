//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Quantity, quantity parsing, Error, and configuration.
