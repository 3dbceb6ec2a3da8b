/*!
Types and routines shared by the matching engines.

Most users only need [`syntax`] (to turn pattern strings into a
[`Pattern`](pattern::Pattern)) and [`pattern`] (to build or inspect patterns
directly). The [`prefilter`] module is used by the
[`meta::Regex`](crate::meta::Regex) but is exposed in case it is useful on
its own.
*/

pub mod pattern;
pub mod prefilter;
pub mod syntax;

pub(crate) mod escape;
