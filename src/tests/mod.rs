//! Test doubles shared by the unit tests, and end-to-end scenarios that drive
//! the whole MQTT context through them.

pub(crate) mod support;
