/// A pending mutation for one store entry.
///
/// An action is either a literal value or a derivation applied to the
/// value currently stored under the identifier (falling back to the store
/// default when no entry exists). The two forms carry an explicit tag, so
/// value types that happen to be callable stay unambiguous.
///
/// # Examples
///
/// ```
/// use cubby::StoreAction;
///
/// let literal = StoreAction::Value(3);
/// assert_eq!(literal.resolve(0), 3);
///
/// let derived = StoreAction::update(|n: i32| n + 1);
/// assert_eq!(derived.resolve(3), 4);
/// ```
pub enum StoreAction<T> {
    /// Replace the entry with this value.
    Value(T),
    /// Replace the entry with a function of the previous value.
    Update(Box<dyn FnOnce(T) -> T + Send>),
}

impl<T> StoreAction<T> {
    /// Create a derivation action from a function of the previous value.
    pub fn update<F>(f: F) -> Self
    where
        F: FnOnce(T) -> T + Send + 'static,
    {
        StoreAction::Update(Box::new(f))
    }

    /// Resolve the action against the value currently stored.
    ///
    /// Consumes the action; a derivation runs exactly once.
    pub fn resolve(self, current: T) -> T {
        match self {
            StoreAction::Value(value) => value,
            StoreAction::Update(f) => f(current),
        }
    }
}

impl<T> From<T> for StoreAction<T> {
    fn from(value: T) -> Self {
        StoreAction::Value(value)
    }
}

impl<T> std::fmt::Debug for StoreAction<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreAction::Value(value) => f.debug_tuple("Value").field(value).finish(),
            StoreAction::Update(_) => f.debug_tuple("Update").field(&"<fn>").finish(),
        }
    }
}
