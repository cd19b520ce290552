/// Partial-update instruction for a nullable field.
///
/// Keeps "not provided" apart from "explicitly cleared", which a plain
/// `Option` cannot express.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldUpdate<T> {
    #[default]
    Unchanged,
    Set(T),
    Clear,
}

impl<T> FieldUpdate<T> {
    /// Build from the double option produced by a JSON body:
    /// absent key → `None`, `null` → `Some(None)`, value → `Some(Some(v))`.
    pub fn from_present(value: Option<Option<T>>) -> Self {
        match value {
            None => FieldUpdate::Unchanged,
            Some(None) => FieldUpdate::Clear,
            Some(Some(v)) => FieldUpdate::Set(v),
        }
    }

    /// Apply this update to the current value of the field.
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            FieldUpdate::Unchanged => current,
            FieldUpdate::Set(v) => Some(v),
            FieldUpdate::Clear => None,
        }
    }

    /// Validate the carried value, leaving `Unchanged` and `Clear` as they are.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<FieldUpdate<U>, E> {
        Ok(match self {
            FieldUpdate::Unchanged => FieldUpdate::Unchanged,
            FieldUpdate::Set(v) => FieldUpdate::Set(f(v)?),
            FieldUpdate::Clear => FieldUpdate::Clear,
        })
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, FieldUpdate::Unchanged)
    }
}
