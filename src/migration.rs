//! Migration definitions.
//!
//! A migration is a version string plus an optional forward (`up`) and
//! backward (`down`) action. Actions receive the caller's context by
//! mutable reference; the context type is chosen by the application and
//! fixed at compile time.

use std::fmt;

/// Boxed migration action.
pub type ActionFn<C> = Box<dyn Fn(&mut C) -> anyhow::Result<()>>;

/// Direction a migration is executed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Apply the migration.
    Up,
    /// Revert the migration.
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// One side of a migration. `Absent` is only an error when that side is run.
pub enum Action<C> {
    Present(ActionFn<C>),
    Absent,
}

impl<C> Action<C> {
    /// Wrap a closure as a present action.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut C) -> anyhow::Result<()> + 'static,
    {
        Action::Present(Box::new(f))
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Action::Present(_))
    }
}

impl<C> Default for Action<C> {
    fn default() -> Self {
        Action::Absent
    }
}

impl<C> fmt::Debug for Action<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Present(_) => write!(f, "Present(..)"),
            Action::Absent => write!(f, "Absent"),
        }
    }
}

/// A named, versioned, reversible change unit.
///
/// The version must be unique within a registry and sort correctly as a
/// plain string (zero-padded timestamps such as `20250119_100000` do).
pub struct Migration<C> {
    version: String,
    up: Action<C>,
    down: Action<C>,
}

impl<C> fmt::Debug for Migration<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Migration")
            .field("version", &self.version)
            .field("up", &self.up)
            .field("down", &self.down)
            .finish()
    }
}

impl<C> Migration<C> {
    /// Create a migration with no actions.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            up: Action::Absent,
            down: Action::Absent,
        }
    }

    /// Set the forward action.
    pub fn up<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut C) -> anyhow::Result<()> + 'static,
    {
        self.up = Action::new(f);
        self
    }

    /// Set the backward action.
    pub fn down<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut C) -> anyhow::Result<()> + 'static,
    {
        self.down = Action::new(f);
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// The action for the given direction.
    pub fn action(&self, direction: Direction) -> &Action<C> {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
        }
    }

    /// True if both directions are defined.
    pub fn is_reversible(&self) -> bool {
        self.up.is_present() && self.down.is_present()
    }
}
