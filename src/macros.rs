//! Typed accessor macros
//!
//! These macros generate getter/setter pairs over a `meta: Metadata` field.
//! They use `paste` internally for identifier concatenation.

// =============================================================================
// Text field accessors
// =============================================================================

/// Generate `xxx()` and `set_xxx()` for text fields stored under a key
///
/// # Generated methods per field:
/// - `xxx(&self) -> Option<&str>` - text value, `None` if absent or not text
/// - `set_xxx(&mut self, value) -> FingerprintResult<()>` - stores text
///
/// # Example
/// ```ignore
/// impl FrontMatter {
///     impl_text_fields!(title => "title", kind => "type");
/// }
/// ```
macro_rules! impl_text_fields {
    ($($field:ident => $key:literal),* $(,)?) => {
        ::paste::paste! {
            $(
                #[doc = "Get the `" $field "` field as text"]
                pub fn $field(&self) -> Option<&str> {
                    self.meta.get($key).and_then($crate::value::Value::as_str)
                }

                #[doc = "Set the `" $field "` field"]
                pub fn [<set_ $field>](
                    &mut self,
                    value: impl Into<String>,
                ) -> $crate::error::FingerprintResult<()> {
                    self.meta.set($key, value.into())
                }
            )*
        }
    };
}

/// Generate `xxx()` and `set_xxx()` for boolean flags stored under a key
macro_rules! impl_flag_fields {
    ($($field:ident => $key:literal),* $(,)?) => {
        ::paste::paste! {
            $(
                #[doc = "Get the `" $field "` flag"]
                pub fn $field(&self) -> Option<bool> {
                    self.meta.get($key).and_then($crate::value::Value::as_bool)
                }

                #[doc = "Set the `" $field "` flag"]
                pub fn [<set_ $field>](
                    &mut self,
                    value: bool,
                ) -> $crate::error::FingerprintResult<()> {
                    self.meta.set($key, value)
                }
            )*
        }
    };
}
