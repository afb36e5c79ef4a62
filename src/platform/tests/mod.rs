//! Unit tests for the platform adapter services.
