//! Memoization keys
//!
//! A [`MemoKey`] is a snapshot of an argument sequence:
//!
//! - primitives compare by value (floats by bit pattern)
//! - tuples compare element-wise
//! - hashable containers compare by kind and by their fingerprint at key
//!   time
//!
//! Construction is a capability check. Arguments that cannot be keys (a
//! plain `List`, or a container that cannot be fingerprinted) yield
//! [`Unkeyable`] and the caller takes the uncached branch.

use compact_str::CompactString;
use smallvec::SmallVec;
use thiserror::Error;

use crate::error::FingerprintResult;
use crate::hash::Fingerprint;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyAtom {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    Text(CompactString),
    Tuple(Box<[KeyAtom]>),
    Content(&'static str, Fingerprint),
}

impl KeyAtom {
    fn from_value(value: &Value) -> Result<Self, &'static str> {
        let atom = match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Int(i) => Self::Int(*i),
            Value::Float(f) => Self::Float(f.to_bits()),
            Value::Text(s) => Self::Text(CompactString::from(s.as_str())),
            Value::Tuple(items) => Self::Tuple(
                items
                    .iter()
                    .map(Self::from_value)
                    .collect::<Result<_, _>>()?,
            ),
            Value::List(_) => return Err(value.kind()),
            Value::Seq(seq) => Self::content(value.kind(), seq.fingerprint())?,
            Value::Map(map) => Self::content(value.kind(), map.fingerprint())?,
            Value::Meta(meta) => Self::content(value.kind(), meta.fingerprint())?,
        };
        Ok(atom)
    }

    fn content(
        kind: &'static str,
        fingerprint: FingerprintResult<Fingerprint>,
    ) -> Result<Self, &'static str> {
        fingerprint.map(|fp| Self::Content(kind, fp)).map_err(|_| kind)
    }
}

/// Cache key for an argument sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoKey(SmallVec<[KeyAtom; 4]>);

impl MemoKey {
    /// Try to build a key from arguments.
    pub fn new(args: &[Value]) -> Result<Self, Unkeyable> {
        args.iter()
            .enumerate()
            .map(|(position, arg)| {
                KeyAtom::from_value(arg).map_err(|kind| Unkeyable { position, kind })
            })
            .collect::<Result<_, _>>()
            .map(Self)
    }

    /// Number of arguments captured
    pub fn arity(&self) -> usize {
        self.0.len()
    }
}

/// Arguments could not serve as a cache key.
///
/// Not an error for callers: the memo cache falls back to an uncached call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("argument {position} of kind `{kind}` cannot be a cache key")]
pub struct Unkeyable {
    /// Index of the first offending argument
    pub position: usize,
    /// Kind of the offending argument
    pub kind: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::HashableList;
    use crate::map::HashableMap;
    use crate::metadata::Metadata;

    #[test]
    fn test_primitive_keys_compare_by_value() {
        let a = MemoKey::new(&[Value::Int(3), Value::from("x")]).unwrap();
        let b = MemoKey::new(&[Value::Int(3), Value::from("x")]).unwrap();
        let c = MemoKey::new(&[Value::from("x"), Value::Int(3)]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.arity(), 2);
    }

    #[test]
    fn test_float_keys_by_bits() {
        let pos = MemoKey::new(&[Value::Float(0.0)]).unwrap();
        let neg = MemoKey::new(&[Value::Float(-0.0)]).unwrap();
        assert_ne!(pos, neg);
    }

    #[test]
    fn test_hashable_containers_key_by_fingerprint() {
        let map: HashableMap = [("k", 1)].into_iter().collect();
        let same: HashableMap = [("k", 1)].into_iter().collect();
        let a = MemoKey::new(&[Value::Map(map)]).unwrap();
        let b = MemoKey::new(&[Value::Map(same)]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_container_kinds_do_not_share_keys() {
        let seq = MemoKey::new(&[Value::Seq(HashableList::new())]).unwrap();
        let map = MemoKey::new(&[Value::Map(HashableMap::new())]).unwrap();
        let meta = MemoKey::new(&[Value::Meta(Metadata::new())]).unwrap();
        assert_ne!(seq, map);
        assert_ne!(map, meta);
        assert_ne!(seq, meta);
    }

    #[test]
    fn test_list_is_unkeyable() {
        let err = MemoKey::new(&[Value::Int(1), Value::list([1, 2])]).unwrap_err();
        assert_eq!(err, Unkeyable { position: 1, kind: "list" });
    }

    #[test]
    fn test_nested_list_is_unkeyable() {
        let in_tuple = MemoKey::new(&[Value::tuple([Value::list([1])])]);
        assert_eq!(in_tuple.unwrap_err().kind, "list");

        let seq: HashableList = vec![Value::list([1])].into();
        let in_seq = MemoKey::new(&[Value::Seq(seq)]);
        assert_eq!(in_seq.unwrap_err().kind, "hashable list");
    }

    #[test]
    fn test_empty_args_are_a_key() {
        assert_eq!(MemoKey::new(&[]).unwrap().arity(), 0);
    }
}
