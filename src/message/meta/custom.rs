use alloc::{boxed::Box, collections::BTreeMap, vec::Vec};
use core::fmt;

use crate::MetaError;

#[doc = r#"
A meta event type supplied by the caller.

Register an implementation on [`ReadSettings`](crate::settings::ReadSettings)
to have meta events of an otherwise unknown type decoded into it rather
than kept as raw bytes. Implementations must be constructible with
[`Default`]; the reader creates an empty value and then fills it from the
payload.

```rust
use smfkit::prelude::*;

#[derive(Debug, Clone, Default, PartialEq)]
struct Loop { start: u16 }

impl CustomMetaEvent for Loop {
    fn read(&mut self, payload: &[u8]) -> Result<(), MetaError> {
        let [a, b, ..] = payload else {
            return Err(MetaError::Length { kind: "Loop", expected: 2, actual: payload.len() });
        };
        self.start = u16::from_be_bytes([*a, *b]);
        Ok(())
    }
    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.start.to_be_bytes());
    }
    fn clone_boxed(&self) -> Box<dyn CustomMetaEvent> {
        Box::new(self.clone())
    }
}

let settings = ReadSettings::default().with_custom_meta::<Loop>(0x60);
assert!(settings.custom_meta_types.contains(0x60));
```
"#]
pub trait CustomMetaEvent: fmt::Debug + Send + Sync {
    /// Fill the value from the declared payload.
    ///
    /// Bytes left unread are skipped.
    fn read(&mut self, payload: &[u8]) -> Result<(), MetaError>;

    /// Append the payload bytes
    fn write(&self, out: &mut Vec<u8>);

    /// Clone behind the box
    fn clone_boxed(&self) -> Box<dyn CustomMetaEvent>;
}

/// A decoded custom meta event with its type byte
pub struct CustomMeta {
    status: u8,
    event: Box<dyn CustomMetaEvent>,
}

impl CustomMeta {
    /// Wrap a value as a meta event of type `status`
    pub fn new(status: u8, event: impl CustomMetaEvent + 'static) -> Self {
        Self {
            status,
            event: Box::new(event),
        }
    }
    /// The meta type byte
    pub const fn status(&self) -> u8 {
        self.status
    }
    /// The decoded value
    pub fn event(&self) -> &dyn CustomMetaEvent {
        self.event.as_ref()
    }
    pub(crate) fn payload(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.event.write(&mut out);
        out
    }
}

impl Clone for CustomMeta {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            event: self.event.clone_boxed(),
        }
    }
}

impl fmt::Debug for CustomMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomMeta")
            .field("status", &self.status)
            .field("event", &self.event)
            .finish()
    }
}

/// Two custom events are equal when they have the same type and encode to the same bytes
impl PartialEq for CustomMeta {
    fn eq(&self, other: &Self) -> bool {
        self.status == other.status && self.payload() == other.payload()
    }
}

type Constructor = fn() -> Box<dyn CustomMetaEvent>;

fn construct<T: CustomMetaEvent + Default + 'static>() -> Box<dyn CustomMetaEvent> {
    Box::new(T::default())
}

/// Meta type bytes mapped to the types that decode them
#[derive(Debug, Clone, Default)]
pub struct CustomMetaRegistry {
    constructors: BTreeMap<u8, Constructor>,
}

impl CustomMetaRegistry {
    /// Decode meta events of type `status` as `T`.
    ///
    /// Types the crate already knows are never dispatched here.
    pub fn register<T>(&mut self, status: u8) -> &mut Self
    where
        T: CustomMetaEvent + Default + 'static,
    {
        self.constructors.insert(status, construct::<T>);
        self
    }
    /// True if a type was registered for `status`
    pub fn contains(&self, status: u8) -> bool {
        self.constructors.contains_key(&status)
    }
    /// True if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    pub(crate) fn decode(
        &self,
        status: u8,
        payload: &[u8],
    ) -> Option<Result<CustomMeta, MetaError>> {
        let constructor = self.constructors.get(&status)?;
        let mut event = constructor();
        Some(event.read(payload).map(|()| CustomMeta { status, event }))
    }
}
