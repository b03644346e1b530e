//! Unit tests for the identity and team directory.
