use crate::config::Result;
use serde_json::Value;

/// A component whose state can be dumped and restored as JSON.
pub trait Debuggable {
    /// Reads the component's state and returns it as a JSON value.
    fn read_state(&self) -> Result<Value>;

    /// Replaces the component's state from a JSON value.
    ///
    /// On error the component is left untouched.
    fn write_state(&mut self, state: &Value) -> Result<()>;
}
