/// Runtime settings of a [`Converter`](crate::Converter).
///
/// # Examples
///
/// ```
/// use docmap_reflect::ConvertOptions;
///
/// let options = ConvertOptions::new().with_max_depth(8);
/// assert_eq!(options.max_depth, 8);
/// assert_eq!(ConvertOptions::default().max_depth, ConvertOptions::DEFAULT_MAX_DEPTH);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Deepest nesting of documents below the converted one.
    ///
    /// Bounds recursion through optional self-referential fields, which
    /// registration cannot rule out.
    pub max_depth: usize,
}

impl ConvertOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    #[inline]
    pub const fn new() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    #[inline]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ConvertOptions {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
