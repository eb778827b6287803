//! Pure functions that build new picklers out of existing ones.
//!
//! Every combinator preserves one invariant above all others: the read path
//! visits components in exactly the order the write path emitted them. None
//! of them catch errors from the picklers they delegate to.

use crate::{
    buffer::{Sink, Source},
    errors::PickleError,
    primitives::{put_len, take_len, LEN_WIDTH},
    vecmap::VecMap,
    Pickler,
};
use failure::Error;
use std::{convert::TryInto, sync::Arc};

/// Groups two picklers into a pickler for the pair, written and read left to
/// right.
///
/// # Example
///
/// ```
/// use brine::prelude::*;
///
/// let header = tuple2(uint16(), string());
///
/// let bytes = pickle(&header, &(7, "ok".to_owned())).unwrap();
/// assert_eq!(unpickle(&header, &bytes).unwrap(), (7, "ok".to_owned()));
/// ```
pub fn tuple2<A: 'static, B: 'static>(a: Pickler<A>, b: Pickler<B>) -> Pickler<(A, B)> {
    let min = a.min_size() + b.min_size();
    let (aw, ar) = (a.clone(), a);
    let (bw, br) = (b.clone(), b);
    Pickler::primitive(
        move |v: &(A, B), out: &mut Sink| {
            aw.write_to(&v.0, out)?;
            bw.write_to(&v.1, out)
        },
        move |src: &mut Source| {
            let a = ar.read_from(src)?;
            let b = br.read_from(src)?;
            Ok((a, b))
        },
        min,
    )
}

/// Groups three picklers into a pickler for the triple, written and read left
/// to right.
pub fn tuple3<A: 'static, B: 'static, C: 'static>(
    a: Pickler<A>,
    b: Pickler<B>,
    c: Pickler<C>,
) -> Pickler<(A, B, C)> {
    let min = a.min_size() + b.min_size() + c.min_size();
    let (aw, ar) = (a.clone(), a);
    let (bw, br) = (b.clone(), b);
    let (cw, cr) = (c.clone(), c);
    Pickler::primitive(
        move |v: &(A, B, C), out: &mut Sink| {
            aw.write_to(&v.0, out)?;
            bw.write_to(&v.1, out)?;
            cw.write_to(&v.2, out)
        },
        move |src: &mut Source| {
            let a = ar.read_from(src)?;
            let b = br.read_from(src)?;
            let c = cr.read_from(src)?;
            Ok((a, b, c))
        },
        min,
    )
}

/// Groups four picklers into a pickler for the quadruple, written and read
/// left to right.
pub fn tuple4<A: 'static, B: 'static, C: 'static, D: 'static>(
    a: Pickler<A>,
    b: Pickler<B>,
    c: Pickler<C>,
    d: Pickler<D>,
) -> Pickler<(A, B, C, D)> {
    let min = a.min_size() + b.min_size() + c.min_size() + d.min_size();
    let (aw, ar) = (a.clone(), a);
    let (bw, br) = (b.clone(), b);
    let (cw, cr) = (c.clone(), c);
    let (dw, dr) = (d.clone(), d);
    Pickler::primitive(
        move |v: &(A, B, C, D), out: &mut Sink| {
            aw.write_to(&v.0, out)?;
            bw.write_to(&v.1, out)?;
            cw.write_to(&v.2, out)?;
            dw.write_to(&v.3, out)
        },
        move |src: &mut Source| {
            let a = ar.read_from(src)?;
            let b = br.read_from(src)?;
            let c = cr.read_from(src)?;
            let d = dr.read_from(src)?;
            Ok((a, b, c, d))
        },
        min,
    )
}

/// A pickler for a sequence of exactly `count` elements.
///
/// The count is fixed when the pickler is composed and is never written to
/// the stream; the surrounding format carries it, either implicitly or
/// through a separate length field composed with [`tuple2`]. Writing a vector
/// of any other length fails with a length mismatch; reading more elements
/// than the source holds fails with an underflow from the element codec.
///
/// `count = 0` writes and reads nothing at all.
pub fn list<T: 'static>(elem: Pickler<T>, count: usize) -> Pickler<Vec<T>> {
    let min = elem.min_size() * count;
    let (ew, er) = (elem.clone(), elem);
    Pickler::primitive(
        move |v: &Vec<T>, out: &mut Sink| {
            if v.len() != count {
                return Err(PickleError::LengthMismatch {
                    expected: count,
                    found: v.len(),
                }
                .into());
            }
            for item in v {
                ew.write_to(item, out)?;
            }
            Ok(())
        },
        move |src: &mut Source| {
            let mut out = Vec::with_capacity(count);
            for _ in 0..count {
                out.push(er.read_from(src)?);
            }
            Ok(out)
        },
        min,
    )
}

/// A pickler for a fixed-size array, written and read like [`list`] with
/// `count = N`.
pub fn array<T: 'static, const N: usize>(elem: Pickler<T>) -> Pickler<[T; N]> {
    let min = elem.min_size() * N;
    let (ew, er) = (elem.clone(), elem);
    Pickler::primitive(
        move |v: &[T; N], out: &mut Sink| {
            for item in v.iter() {
                ew.write_to(item, out)?;
            }
            Ok(())
        },
        move |src: &mut Source| {
            let mut out = Vec::with_capacity(N);
            for _ in 0..N {
                out.push(er.read_from(src)?);
            }
            match out.try_into() {
                Ok(arr) => Ok(arr),
                // the loop pushed exactly N elements
                Err(_) => unreachable!(),
            }
        },
        min,
    )
}

/// A self-framing sequence: a `u32` little-endian element count, then the
/// elements. The count read back decides how many elements are consumed.
pub fn prefixed<T: 'static>(elem: Pickler<T>) -> Pickler<Vec<T>> {
    let (ew, er) = (elem.clone(), elem);
    Pickler::primitive(
        move |v: &Vec<T>, out: &mut Sink| {
            put_len(out, v.len())?;
            for item in v {
                ew.write_to(item, out)?;
            }
            Ok(())
        },
        move |src: &mut Source| {
            let count = take_len(src)?;
            let mut out = Vec::new();
            for _ in 0..count {
                out.push(er.read_from(src)?);
            }
            Ok(out)
        },
        LEN_WIDTH,
    )
}

/// Adapts a pickler for `A` into a pickler for `B` through an isomorphism
/// pair.
///
/// `from_base` turns a decoded `A` into the derived type; `to_base` turns a
/// `B` back into the representation the base pickler writes. The pair must
/// satisfy `to_base(from_base(a)) == a` over the domain of interest; that
/// contract is the caller's to uphold, it is not checked here.
///
/// This is how arbitrary user types obtain a codec: express the type as an
/// isomorphism to a tuple of primitives, then wrap.
///
/// # Example
///
/// ```
/// use brine::prelude::*;
///
/// #[derive(Debug, PartialEq, Clone)]
/// struct Employee {
///     id: u32,
///     name: String,
/// }
///
/// let employee = wrap(
///     |(id, name)| Employee { id, name },
///     |e: &Employee| (e.id, e.name.clone()),
///     tuple2(uint32(), string()),
/// );
///
/// let original = Employee { id: 7, name: "ok".to_owned() };
/// let bytes = pickle(&employee, &original).unwrap();
/// assert_eq!(unpickle(&employee, &bytes).unwrap(), original);
/// ```
pub fn wrap<A, B, F, G>(from_base: F, to_base: G, base: Pickler<A>) -> Pickler<B>
where
    A: 'static,
    B: 'static,
    F: Fn(A) -> B + Send + Sync + 'static,
    G: Fn(&B) -> A + Send + Sync + 'static,
{
    let min = base.min_size();
    let (bw, br) = (base.clone(), base);
    Pickler::primitive(
        move |v: &B, out: &mut Sink| bw.write_to(&to_base(v), out),
        move |src: &mut Source| Ok(from_base(br.read_from(src)?)),
        min,
    )
}

/// Fallible [`wrap`]: either conversion may fail, and the failure aborts the
/// surrounding pickle or unpickle call verbatim.
pub fn try_wrap<A, B, F, G>(from_base: F, to_base: G, base: Pickler<A>) -> Pickler<B>
where
    A: 'static,
    B: 'static,
    F: Fn(A) -> Result<B, Error> + Send + Sync + 'static,
    G: Fn(&B) -> Result<A, Error> + Send + Sync + 'static,
{
    let min = base.min_size();
    let (bw, br) = (base.clone(), base);
    Pickler::primitive(
        move |v: &B, out: &mut Sink| bw.write_to(&to_base(v)?, out),
        move |src: &mut Source| from_base(br.read_from(src)?),
        min,
    )
}

/// Tagged alternation: a `u8` discriminant, then the arm it selects.
///
/// On the write side `tag_of` names the arm a value belongs to; on the read
/// side the discriminant that comes off the wire selects it. A discriminant
/// with no arm fails with an unknown-tag error in either direction.
///
/// # Example
///
/// ```
/// use brine::prelude::*;
///
/// #[derive(Debug, PartialEq, Clone)]
/// enum Id {
///     Num(i64),
///     Name(String),
/// }
///
/// let id = choice(
///     |v: &Id| match v {
///         Id::Num(_) => 0,
///         Id::Name(_) => 1,
///     },
///     vec![
///         (0, wrap(
///             Id::Num,
///             |v: &Id| match v {
///                 Id::Num(n) => *n,
///                 _ => unreachable!(),
///             },
///             int64(),
///         )),
///         (1, wrap(
///             Id::Name,
///             |v: &Id| match v {
///                 Id::Name(s) => s.clone(),
///                 _ => unreachable!(),
///             },
///             string(),
///         )),
///     ],
/// );
///
/// let bytes = pickle(&id, &Id::Num(-1)).unwrap();
/// assert_eq!(bytes[0], 0);
/// assert_eq!(unpickle(&id, &bytes).unwrap(), Id::Num(-1));
/// ```
pub fn choice<T, F>(tag_of: F, arms: Vec<(u8, Pickler<T>)>) -> Pickler<T>
where
    T: 'static,
    F: Fn(&T) -> u8 + Send + Sync + 'static,
{
    let arms: Arc<VecMap<u8, Pickler<T>>> = Arc::new(arms.into_iter().collect());
    let min = 1 + arms.iter().map(|(_, p)| p.min_size()).min().unwrap_or(0);
    let read_arms = arms.clone();
    Pickler::primitive(
        move |v: &T, out: &mut Sink| {
            let tag = tag_of(v);
            match arms.get(&tag) {
                Some(p) => {
                    out.put_u8(tag);
                    p.write_to(v, out)
                }
                None => Err(PickleError::UnknownTag { tag, at: out.len() }.into()),
            }
        },
        move |src: &mut Source| {
            let at = src.position();
            let tag = src.take_byte()?;
            match read_arms.get(&tag) {
                Some(p) => p.read_from(src),
                None => Err(PickleError::UnknownTag { tag, at }.into()),
            }
        },
        min,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{pickle, prelude::*, unpickle};

    #[test]
    fn tuples_write_left_to_right() {
        let out = pickle(&tuple2(int8(), int16()), &(1, 2)).unwrap();
        assert_eq!(out, vec![1, 2, 0]);

        // the reordered pickler over swapped values encodes differently
        let swapped = pickle(&tuple2(int16(), int8()), &(2, 1)).unwrap();
        assert_eq!(swapped, vec![2, 0, 1]);
        assert_ne!(out, swapped);
    }

    #[test]
    fn tuple_encoding_is_the_concatenation_of_its_parts() {
        let pair = tuple2(int32(), string());
        let out = pickle(&pair, &(7, "ok".to_owned())).unwrap();

        let mut expected = pickle(&int32(), &7).unwrap();
        expected.extend(pickle(&string(), &"ok".to_owned()).unwrap());
        assert_eq!(out, expected);

        assert_eq!(unpickle(&pair, &out).unwrap(), (7, "ok".to_owned()));
    }

    #[test]
    fn quadruples_round_trip() {
        let p = tuple4(int8(), boolean(), float64(), string());
        let v = (-3, true, 2.5, "end".to_owned());
        let out = pickle(&p, &v).unwrap();
        assert_eq!(unpickle(&p, &out).unwrap(), v);
    }

    #[test]
    fn empty_list_consumes_nothing() {
        let p = list(int32(), 0);
        let out = pickle(&p, &Vec::new()).unwrap();
        assert!(out.is_empty());
        assert_eq!(unpickle(&p, &[]).unwrap(), Vec::<i32>::new());
    }

    #[test]
    fn list_is_unframed() {
        let p = list(uint16(), 3);
        let out = pickle(&p, &vec![1, 2, 3]).unwrap();
        assert_eq!(out, vec![1, 0, 2, 0, 3, 0]);
        assert_eq!(unpickle(&p, &out).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn list_rejects_the_wrong_element_count() {
        let err = pickle(&list(int32(), 2), &vec![1]).unwrap_err();
        match err.downcast_ref::<PickleError>() {
            Some(PickleError::LengthMismatch {
                expected: 2,
                found: 1,
            }) => {}
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn over_long_list_reads_underflow() {
        let bytes = pickle(&list(int32(), 2), &vec![1, 2]).unwrap();
        let err = unpickle(&list(int32(), 3), &bytes).unwrap_err();
        match err.downcast_ref::<PickleError>() {
            Some(PickleError::Underflow { at: 8, .. }) => {}
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn arrays_round_trip() {
        let p = array::<i16, 3>(int16());
        let out = pickle(&p, &[5, -6, 7]).unwrap();
        assert_eq!(out.len(), 6);
        assert_eq!(unpickle(&p, &out).unwrap(), [5, -6, 7]);
    }

    #[test]
    fn prefixed_carries_its_own_count() {
        let p = prefixed(uint8());
        let out = pickle(&p, &vec![9, 8, 7]).unwrap();
        assert_eq!(out, vec![3, 0, 0, 0, 9, 8, 7]);
        assert_eq!(unpickle(&p, &out).unwrap(), vec![9, 8, 7]);

        let empty = pickle(&p, &Vec::new()).unwrap();
        assert_eq!(empty, vec![0, 0, 0, 0]);
    }

    #[test]
    fn try_wrap_failures_propagate() {
        // only even numbers are considered valid on the way out
        let evens = try_wrap(
            |n: i32| {
                if n % 2 == 0 {
                    Ok(n)
                } else {
                    Err(PickleError::Malformed {
                        kind: "even",
                        at: 0,
                        reason: format!("{} is odd", n),
                    }
                    .into())
                }
            },
            |n: &i32| Ok(*n),
            int32(),
        );

        let bytes = pickle(&evens, &4).unwrap();
        assert_eq!(unpickle(&evens, &bytes).unwrap(), 4);

        let odd = pickle(&int32(), &5).unwrap();
        let err = unpickle(&evens, &odd).unwrap_err();
        match err.downcast_ref::<PickleError>() {
            Some(PickleError::Malformed { kind: "even", .. }) => {}
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[derive(Debug, PartialEq, Clone)]
    enum Sample {
        N(i32),
        S(String),
    }

    fn sample_tag(v: &Sample) -> u8 {
        match v {
            Sample::N(_) => 0,
            Sample::S(_) => 1,
        }
    }

    fn n_arm() -> Pickler<Sample> {
        wrap(
            Sample::N,
            |v: &Sample| match v {
                Sample::N(n) => *n,
                _ => unreachable!(),
            },
            int32(),
        )
    }

    fn s_arm() -> Pickler<Sample> {
        wrap(
            Sample::S,
            |v: &Sample| match v {
                Sample::S(s) => s.clone(),
                _ => unreachable!(),
            },
            string(),
        )
    }

    #[test]
    fn choice_selects_by_discriminant() {
        let p = choice(sample_tag, vec![(0, n_arm()), (1, s_arm())]);

        let out = pickle(&p, &Sample::S("hi".to_owned())).unwrap();
        assert_eq!(out[0], 1);
        assert_eq!(unpickle(&p, &out).unwrap(), Sample::S("hi".to_owned()));

        let out = pickle(&p, &Sample::N(-9)).unwrap();
        assert_eq!(out[0], 0);
        assert_eq!(unpickle(&p, &out).unwrap(), Sample::N(-9));
    }

    #[test]
    fn unknown_tags_fail_on_read() {
        let p = choice(sample_tag, vec![(0, n_arm()), (1, s_arm())]);
        let err = unpickle(&p, &[9, 0, 0, 0, 0]).unwrap_err();
        match err.downcast_ref::<PickleError>() {
            Some(PickleError::UnknownTag { tag: 9, at: 0 }) => {}
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn unknown_tags_fail_on_write() {
        // no arm for strings
        let p = choice(sample_tag, vec![(0, n_arm())]);
        let err = pickle(&p, &Sample::S("nope".to_owned())).unwrap_err();
        match err.downcast_ref::<PickleError>() {
            Some(PickleError::UnknownTag { tag: 1, .. }) => {}
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn min_sizes() {
        assert_eq!(tuple2(int32(), float64()).min_size(), 12);
        assert_eq!(list(int16(), 4).min_size(), 8);
        assert_eq!(array::<u8, 16>(uint8()).min_size(), 16);
        assert_eq!(prefixed(int64()).min_size(), 4);
        assert_eq!(wrap(|n: i8| n, |n: &i8| *n, int8()).min_size(), 1);
        let p = choice(sample_tag, vec![(0, n_arm()), (1, s_arm())]);
        assert_eq!(p.min_size(), 5);
    }
}
