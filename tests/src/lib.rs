//! End-to-end checks against services bound to the loopback interface.

#[cfg(test)]
mod check;
