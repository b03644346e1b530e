//! Unit tests for notification dispatch and the inbox surface.

mod dispatcher_tests;
