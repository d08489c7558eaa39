//! Keyed store shared by the nodes of one tree.
//!
//! The [`Blackboard`] itself is the engine-level store: the driver may seed or inspect it
//! freely. Nodes go through a [`BlackboardClient`], which only reads keys it registered for
//! reading and only writes keys it registered for writing. Registration is closed once the
//! blackboard is sealed, which the tree does right after its setup pass.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use crate::BlackboardError;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BbKey<T: 'static> {
    name: &'static str,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: 'static> Copy for BbKey<T> {}

impl<T: 'static> Clone for BbKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> BbKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _phantom: PhantomData,
        }
    }

    pub fn name(self) -> &'static str {
        self.name
    }
}

/// Declared access of a client to one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Access {
    Read,
    Write,
    ReadWrite,
}

impl Access {
    pub fn can_read(self) -> bool {
        matches!(self, Access::Read | Access::ReadWrite)
    }

    pub fn can_write(self) -> bool {
        matches!(self, Access::Write | Access::ReadWrite)
    }

    /// Combined access after registering `self` and `other` for the same key.
    pub fn union(self, other: Access) -> Access {
        if self == other {
            self
        } else {
            Access::ReadWrite
        }
    }

    fn short(self) -> &'static str {
        match self {
            Access::Read => "r",
            Access::Write => "w",
            Access::ReadWrite => "rw",
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Access::Read => "read",
            Access::Write => "write",
            Access::ReadWrite => "read-write",
        })
    }
}

/// Anything that can live on the blackboard: `'static` and printable for the dump.
pub trait BbValue: Any + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any + fmt::Debug> BbValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Registration {
    client: String,
    access: Access,
}

#[derive(Default)]
pub struct Blackboard {
    values: BTreeMap<&'static str, Box<dyn BbValue>>,
    registrations: BTreeMap<&'static str, Vec<Registration>>,
    sealed: bool,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every value. Registrations and the sealed flag are kept.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn contains<T: 'static>(&self, key: BbKey<T>) -> bool {
        self.values.contains_key(key.name)
    }

    pub fn set<T: BbValue>(&mut self, key: BbKey<T>, value: T) {
        self.values.insert(key.name, Box::new(value));
    }

    pub fn get<T: 'static>(&self, key: BbKey<T>) -> Option<&T> {
        match self.lookup(key) {
            Ok(value) => Some(value),
            Err(BlackboardError::KeyNotSet(_)) => None,
            Err(_) => panic!(
                "blackboard type mismatch for key `{}` (stored type differs from requested)",
                key.name
            ),
        }
    }

    pub fn get_mut<T: 'static>(&mut self, key: BbKey<T>) -> Option<&mut T> {
        let value = self.values.get_mut(key.name)?;
        let value = (**value).as_any_mut().downcast_mut::<T>();
        if value.is_none() {
            panic!(
                "blackboard type mismatch for key `{}` (stored type differs from requested)",
                key.name
            );
        }
        value
    }

    pub fn remove<T: 'static>(&mut self, key: BbKey<T>) -> Option<T> {
        let value = self.values.remove(key.name)?;
        match value.into_any().downcast::<T>() {
            Ok(value) => Some(*value),
            Err(_) => panic!(
                "blackboard type mismatch for key `{}` (stored type differs from requested)",
                key.name
            ),
        }
    }

    /// Names of the keys currently holding a value, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }

    /// Closes registration. Clients registering afterwards get `RegistrationClosed`.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    fn lookup<T: 'static>(&self, key: BbKey<T>) -> Result<&T, BlackboardError> {
        let value = self
            .values
            .get(key.name)
            .ok_or(BlackboardError::KeyNotSet(key.name))?;
        (**value)
            .as_any()
            .downcast_ref::<T>()
            .ok_or(BlackboardError::TypeMismatch(key.name))
    }

    fn record_registration(
        &mut self,
        client: &str,
        key: &'static str,
        access: Access,
    ) -> Result<(), BlackboardError> {
        if self.sealed {
            return Err(BlackboardError::RegistrationClosed {
                client: client.to_string(),
                key,
            });
        }

        let entries = self.registrations.entry(key).or_default();
        match entries.iter_mut().find(|r| r.client == client) {
            Some(existing) => existing.access = existing.access.union(access),
            None => entries.push(Registration {
                client: client.to_string(),
                access,
            }),
        }
        Ok(())
    }
}

impl fmt::Debug for Blackboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blackboard")
            .field("values", &self.values)
            .field("sealed", &self.sealed)
            .finish()
    }
}

impl fmt::Display for Blackboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .values
            .keys()
            .chain(self.registrations.keys())
            .map(|k| k.len())
            .max()
            .unwrap_or(0);

        writeln!(f, "Blackboard Data")?;
        for (key, value) in &self.values {
            writeln!(f, "    {key:<width$} : {value:?}")?;
        }

        writeln!(f, "Blackboard Clients")?;
        for (key, registrations) in &self.registrations {
            let clients = registrations
                .iter()
                .map(|r| format!("{} ({})", r.client, r.access.short()))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(f, "    {key:<width$} : {clients}")?;
        }
        Ok(())
    }
}

/// A node's view of the blackboard, limited to the keys it registered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlackboardClient {
    name: String,
    keys: BTreeMap<&'static str, Access>,
}

impl BlackboardClient {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keys: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declares access to `key`. Registering the same key twice widens the access.
    pub fn register<T: 'static>(
        &mut self,
        blackboard: &mut Blackboard,
        key: BbKey<T>,
        access: Access,
    ) -> Result<(), BlackboardError> {
        blackboard.record_registration(&self.name, key.name, access)?;
        self.keys
            .entry(key.name)
            .and_modify(|a| *a = a.union(access))
            .or_insert(access);
        Ok(())
    }

    pub fn access<T: 'static>(&self, key: BbKey<T>) -> Option<Access> {
        self.keys.get(key.name).copied()
    }

    pub fn get<'bb, T: 'static>(
        &self,
        blackboard: &'bb Blackboard,
        key: BbKey<T>,
    ) -> Result<&'bb T, BlackboardError> {
        self.check(key.name, Access::Read)?;
        blackboard.lookup(key)
    }

    pub fn set<T: BbValue>(
        &self,
        blackboard: &mut Blackboard,
        key: BbKey<T>,
        value: T,
    ) -> Result<(), BlackboardError> {
        self.check(key.name, Access::Write)?;
        blackboard.set(key, value);
        Ok(())
    }

    fn check(&self, key: &'static str, wanted: Access) -> Result<(), BlackboardError> {
        let granted = self.keys.get(key).copied();
        let allowed = match wanted {
            Access::Read => granted.is_some_and(Access::can_read),
            Access::Write | Access::ReadWrite => granted.is_some_and(Access::can_write),
        };
        if allowed {
            Ok(())
        } else {
            Err(BlackboardError::AccessDenied {
                client: self.name.clone(),
                key,
                access: wanted,
            })
        }
    }
}
