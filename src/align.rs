/// Rounds the given size up to the next multiple of `boundary`.
///
/// `boundary` must be a power of two.
///
/// # Examples
///
/// ```rust
/// use rmalloc::align_to;
///
/// assert_eq!(align_to!(13, 16), 16);
/// assert_eq!(align_to!(32, 16), 32);
/// assert_eq!(align_to!(0, 16), 0);
/// ```
#[macro_export]
macro_rules! align_to {
  ($value:expr, $boundary:expr) => {
    ($value + $boundary - 1) & !($boundary - 1)
  };
}
