/// Goto definition for Rails conventions.
///
/// Resolution is a fixed pipeline that starts over from disk on every call:
///   1. Extract the identifier under the cursor and any `A::B::` qualifiers
///      written in front of it.
///   2. Classify the cursor's line into a [`ReferenceCategory`].
///   3. Hand the symbol to that category's resolver, which maps it through
///      Rails naming conventions to candidate files and scans them.
///   4. If the category resolver finds nothing, look for a `def` of the word
///      in the current file (and its controller's helper).
///
/// - [`resolve`]: the [`Resolver`] facade, word/namespace extraction and
///   category dispatch.
/// - [`conventions`]: fixed-path lookups for models, controllers and services.
/// - [`namespaced`]: directory scans for helpers and mailers, with namespace
///   matching and fallback directories.
/// - [`view`]: partial and template lookup for `render` calls.
/// - [`method`]: `def` lookup for callbacks and plain method calls.
///
/// [`ReferenceCategory`]: crate::types::ReferenceCategory
mod conventions;
mod method;
mod namespaced;
pub mod resolve;
mod view;

pub use namespaced::ConstantKind;
pub use resolve::Resolver;
