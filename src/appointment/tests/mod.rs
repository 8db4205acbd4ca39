//! Unit tests for the appointment context.
