//! Structured log message templates.
//!
//! A message template names its placeholders instead of numbering them:
//!
//! ```text
//! User {UserId} logged in from {IpAddress}
//! ```
//!
//! [`Template::compile`] parses such a template once. The compiled template
//! can then be rendered many times:
//!
//! - as display text, with [`Template::render`]
//! - as ordered name/value pairs for structured sinks, with
//!   [`Template::structured_values`]
//!
//! # Quick Start
//!
//! ```rust
//! use logtemplate::{Template, Value, ORIGINAL_FORMAT_KEY, values};
//!
//! let template = Template::compile("User {UserId} logged in from {IpAddress}");
//! let args = values![42, "10.0.0.1"];
//!
//! assert_eq!(
//!     template.render(&args).unwrap(),
//!     "User 42 logged in from 10.0.0.1"
//! );
//!
//! let pairs = template.structured_values(&args).unwrap();
//! assert_eq!(pairs[0], ("UserId", Value::from(42)));
//! assert_eq!(pairs[1], ("IpAddress", Value::from("10.0.0.1")));
//! assert_eq!(pairs[2].0, ORIGINAL_FORMAT_KEY);
//! ```
//!
//! # Template Syntax
//!
//! | Syntax | Meaning |
//! |--------|---------|
//! | `{Name}` | Placeholder |
//! | `{Name,10}` / `{Name,-10}` | Right / left aligned in 10 columns |
//! | `{Name:F2}` | Placeholder with a format spec |
//! | `{Name,8:N0}` | Alignment and format spec |
//! | `{{` / `}}` | Literal `{` / `}` |
//!
//! Placeholder names are not validated. A name runs from the opening brace to
//! the first `,`, or failing that the first `:`, or the closing brace.
//! Compilation never fails: braces that do not form a placeholder are kept as
//! literal text.
//!
//! # Formatting
//!
//! Formatting is culture-invariant: `.` decimal point, `,` group separator,
//! English month and day names, and UTC timestamps.
//!
//! | Type | Format specs |
//! |------|--------------|
//! | Integer | `D`, `X`, `F`, `N`, `E`, `P`, `C`, `G`, `R`, custom (`#,##0.00`) |
//! | Float | `F`, `N`, `E`, `P`, `C`, `G`, `R`, custom |
//! | Timestamp | `d D f F g G m o r s t T u U y`, custom (`yyyy-MM-dd HH:mm`) |
//! | String, Bool, Null | format spec ignored |
//!
//! Booleans render lowercase (`true` / `false`) and null renders empty.
//!
//! Sequence arguments are joined as `"a, b, c"` (nulls skipped) before
//! rendering. Structured values keep them as sequences.
//!
//! # Errors
//!
//! Rendering reports a [`FormatError`]; structured extraction reports an
//! [`IndexError`]. Both surface to the caller; nothing is logged or replaced
//! with a default.

mod composite;
mod datetime;
mod error;
mod log_values;
mod macros;
mod numeric;
mod scan;
mod template;
mod value;

// Re-export public API
pub use error::{FormatError, IndexError, Result};
pub use log_values::LogValues;
pub use template::{Template, ORIGINAL_FORMAT_KEY};
pub use value::{Number, Timestamp, Value, SEQUENCE_SEPARATOR};
