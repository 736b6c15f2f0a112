/// Configuration for a read-mode [`Resource`](crate::resource::Resource).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceOptions<T> {
    /// Value exposed as `data` before the first successful invocation.
    pub initial_data: Option<T>,

    /// Suppresses automatic invocation.
    ///
    /// A skipped resource starts with `loading == false` and only runs its
    /// producer on an explicit `refetch`, or once `skip` is turned off
    /// through `refresh_if_changed`.
    pub skip: bool,
}

impl<T> Default for ResourceOptions<T> {
    fn default() -> Self {
        Self {
            initial_data: None,
            skip: false,
        }
    }
}

impl<T> ResourceOptions<T> {
    /// Creates options with the given seed value and skip flag.
    #[must_use]
    pub const fn new(initial_data: Option<T>, skip: bool) -> Self {
        Self { initial_data, skip }
    }

    /// Seeds `data` with the given value.
    #[must_use]
    pub fn with_initial_data(mut self, data: T) -> Self {
        self.initial_data = Some(data);
        self
    }

    /// Sets the skip flag.
    #[must_use]
    pub fn skip(mut self, skip: bool) -> Self {
        self.skip = skip;
        self
    }
}
