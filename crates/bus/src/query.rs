/// A read-intent message (query abstraction).
///
/// Queries never change state; they return a read projection (`Output`) that
/// the caller uses to decide what to do next or to build a view.
pub trait Query: core::fmt::Debug + Send + 'static {
    type Output: Send + 'static;
}
