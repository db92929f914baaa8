#![cfg(test)]

use std::hash::{BuildHasher, RandomState};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::alloc::Allocator;
use crate::util::alloc::{BombFactory, CloneBomb, CountedDrop, TestAlloc, ZeroSizedType};
use crate::util::error::{ConstructError, IndexOutOfBounds, ReserveError};
use crate::util::panic::assert_panics;
use crate::vector;

fn values<A: Allocator>(vec: &Vector<CloneBomb, A>) -> Vector<usize> {
    vec.iter().map(|bomb| bomb.value).collect()
}

#[test]
fn test_push_sequence() {
    let mut vec = Vector::new();
    for i in 0..100_u32 {
        vec.push(i * 3);
        assert_eq!(vec.len(), i as usize + 1);
        assert!(vec.len() <= vec.cap(), "Length should never exceed capacity.");
    }

    for (index, value) in vec.iter().enumerate() {
        assert_eq!(*value, index as u32 * 3, "Each element should equal the value pushed.");
    }
    assert_eq!(vec.cap(), 128, "Capacity should double from 1.");
}

#[test]
fn test_scenarios() {
    let mut vec = vector![1, 2, -2, -1];
    vec.push(5);
    assert_eq!(vec.len(), 5);
    assert_eq!(vec, [1, 2, -2, -1, 5]);
    assert!(vec.cap() >= 5);

    let mut vec: Vector<i32> = Vector::new();
    vec.reserve(10);
    vec.push(7);
    assert_eq!(vec.cap(), 10, "Pushing within capacity shouldn't reallocate.");
    assert_eq!(vec.len(), 1);

    let a = vector![1, 2, 3];
    let b = vector![1, 2, 3];
    assert_eq!(a, b);
    assert!(a < vector![1, 2, 4]);
}

#[test]
fn test_ordering() {
    assert!(vector![1, 2] < vector![1, 2, 0], "A prefix should be ordered first.");
    assert!(vector![1, 3] > vector![1, 2, 9], "The first difference should decide.");
    assert!(Vector::<u8>::new() < vector![0]);
    assert_eq!(vector![4, 5].cmp(&vector![4, 5]), std::cmp::Ordering::Equal);
    assert_ne!(vector![1, 2, 3], vector![1, 2]);
}

#[test]
fn test_copy_round_trip() {
    let mut original: Vector<String> = Vector::with_cap(10);
    original.extend(["a", "b", "c"].map(String::from));

    let mut copy = original.clone();
    assert_eq!(copy, original, "A clone should equal its source.");
    assert_eq!(copy.cap(), 3, "A clone should only allocate for the source's elements.");

    copy[0].push('!');
    copy.push(String::from("d"));
    assert_eq!(original, ["a", "b", "c"], "Modifying a clone shouldn't affect the source.");

    let mut target = vector![String::from("z")];
    target.clone_from(&original);
    assert_eq!(target, original);
}

#[test]
fn test_move() {
    let mut source = Vector::from_iter_sized(0..4);
    let expected = source.clone();

    let target = source.take();
    assert_eq!(target, expected, "Moving should preserve the value.");
    assert_eq!((source.len(), source.cap()), (0, 0), "The source should be left empty.");

    let mut source = target;
    let mut target = vector![9, 9];
    target.move_from(&mut source);
    assert_eq!(target, expected);
    assert_eq!((source.len(), source.cap()), (0, 0));

    let counter = CountedDrop::new(0);
    let mut a = Vector::from_fn(3, |_| counter.clone());
    let mut b = Vector::from_fn(2, |_| counter.clone());
    a.move_from(&mut b);
    assert_eq!(counter.take(), 3, "The previous contents should be dropped on move.");
    assert_eq!(a.len(), 2);
}

#[test]
fn test_capacity_idempotence() {
    let mut vec: Vector<i32> = Vector::with_cap(16);
    vec.extend(0..5);

    vec.reserve(8);
    assert_eq!(vec.cap(), 16, "Reserving less than the capacity should do nothing.");

    vec.shrink_to_fit();
    assert_eq!(vec.cap(), 5);
    vec.shrink_to_fit();
    assert_eq!(vec.cap(), 5, "Shrinking twice should be the same as shrinking once.");
    assert_eq!(vec, [0, 1, 2, 3, 4]);

    vec.clear();
    assert_eq!(vec.cap(), 5, "Clearing should keep the capacity.");
    vec.shrink_to_fit();
    assert_eq!(vec.cap(), 0, "Shrinking an empty Vector should release its block.");
}

#[test]
fn test_bounds() {
    let mut vec: Vector<usize> = Vector::new();
    for len in 0..5 {
        assert_eq!(
            vec.at(len),
            Err(IndexOutOfBounds { index: len, len }),
            "Indexing at the length should always fail."
        );
        vec.push(len);
    }

    assert_eq!(vec.at(4), Ok(&4));
    *vec.at_mut(0).expect("Index 0 is in bounds.") = 10;
    assert_eq!(vec.front(), Some(&10));
    assert_eq!(vec.back(), Some(&4));
    assert!(vec.at_mut(5).is_err());

    assert_panics!({
        let vec = vector![1, 2];
        vec[2]
    });

    let mut empty: Vector<u8> = Vector::with_cap(4);
    assert_eq!(empty.pop(), None, "Popping an empty Vector isn't an error.");
    assert_eq!((empty.len(), empty.cap()), (0, 4));
    assert_eq!(empty.front(), None);
}

#[test]
fn test_resize() {
    let mut vec = vector![1, 2];
    vec.resize(5, 7);
    assert_eq!(vec, [1, 2, 7, 7, 7]);
    assert_eq!(vec.cap(), 5, "Growing should reserve exactly the new length.");

    vec.resize(1, 0);
    assert_eq!(vec, [1]);
    assert_eq!(vec.cap(), 5, "Shrinking the length should keep the capacity.");

    let mut vec: Vector<String> = Vector::new();
    vec.resize_default(2);
    assert_eq!(vec, ["", ""]);

    let mut next = 0;
    vec.resize_with(4, || {
        next += 1;
        next.to_string()
    });
    assert_eq!(vec, ["", "", "1", "2"]);
}

#[test]
fn test_resize_rollback() {
    let factory = BombFactory::new();

    for k in 1..=3 {
        let mut vec = Vector::from_fn(3, |i| factory.make(i));
        factory.arm(k);

        assert_panics!({
            vec.resize(6, factory.make(9));
        });

        assert_eq!(values(&vec), [0, 1, 2], "The elements should be unchanged.");
        assert_eq!(vec.cap(), 3, "The capacity should be unchanged after failed growth.");
        assert_eq!(factory.live(), 3, "Every clone made during the failure should be dropped.");
    }

    let mut vec: Vector<CloneBomb> = Vector::with_cap(10);
    vec.extend((0..3).map(|i| factory.make(i)));
    factory.arm(2);
    assert_panics!({
        vec.resize(8, factory.make(9));
    });
    assert_eq!(values(&vec), [0, 1, 2]);
    assert_eq!(vec.cap(), 10);

    drop(vec);
    assert_eq!(factory.live(), 0, "Nothing should be leaked.");
}

#[test]
fn test_fallible_construction() {
    let mut vec = vector![1, 2];
    let mut inputs = ["3", "4", "five"].into_iter();

    let result = vec.try_resize_with(5, || inputs.next().unwrap_or("0").parse::<i32>());
    assert!(matches!(result, Err(ConstructError::Element(_))));
    assert_eq!(vec, [1, 2]);
    assert_eq!(vec.cap(), 2);

    vec.reserve(10);
    let mut inputs = ["3", "x"].into_iter();
    let result = vec.try_resize_with(4, || inputs.next().unwrap_or("0").parse::<i32>());
    assert!(result.is_err_and(|e| e.is_element()));
    assert_eq!(vec, [1, 2], "In-place growth should also roll back.");

    let mut inputs = ["3", "4"].into_iter();
    vec.try_resize_with(4, || inputs.next().unwrap_or("0").parse::<i32>())
        .expect("All inputs are valid.");
    assert_eq!(vec, [1, 2, 3, 4]);

    let counter = CountedDrop::new(0);
    let result = Vector::try_from_fn(5, |i| match i {
        3 => Err(i),
        _ => Ok(counter.clone()),
    });
    assert!(matches!(result, Err(ConstructError::Element(3))));
    assert_eq!(counter.take(), 3, "Partially constructed elements should be dropped.");
}

#[test]
fn test_clone_rollback() {
    let factory = BombFactory::new();
    let vec = Vector::from_fn(4, |i| factory.make(i));

    factory.arm(3);
    assert_panics!({
        let _ = vec.clone();
    });
    assert_eq!(factory.live(), 4, "A failed clone should leave nothing behind.");

    let mut target = Vector::from_fn(2, |i| factory.make(10 + i));
    factory.arm(2);
    assert_panics!({
        target.clone_from(&vec);
    });
    assert_eq!(values(&target), [10, 11], "A failed assignment shouldn't change the target.");

    factory.arm(4);
    assert_panics!({
        let _ = Vector::from_elem(factory.make(7), 6);
    });
    assert_eq!(factory.live(), 6);

    factory.disarm();
    target.clone_from(&vec);
    assert_eq!(values(&target), [0, 1, 2, 3]);
}

#[test]
fn test_allocation_failure() {
    let alloc = TestAlloc::new();
    let mut vec = Vector::with_cap_in(2, alloc.clone());
    vec.push(1);
    vec.push(2);

    alloc.set_failing(true);

    let err = vec.try_push(3).expect_err("Growth should fail.");
    assert!(err.error.is_out_of_memory());
    assert_eq!(err.into_value(), 3, "A failed push should return its value.");
    assert_eq!(vec, [1, 2]);
    assert_eq!(vec.cap(), 2);

    assert_panics!({
        vec.push(3);
    });
    assert_eq!(vec, [1, 2], "A failed push should leave the Vector unchanged.");
    assert_eq!(vec.cap(), 2);

    assert!(vec.try_reserve(10).is_err());
    assert_panics!({
        vec.reserve(10);
    });
    assert_eq!(vec.cap(), 2);

    assert!(matches!(
        vec.try_resize_with(4, || Ok::<_, ()>(0)),
        Err(ConstructError::Reserve(ReserveError::OutOfMemory(_)))
    ));
    assert_eq!(vec, [1, 2]);

    vec.pop();
    assert!(vec.try_shrink_to_fit().is_err());
    assert_eq!((vec.len(), vec.cap()), (1, 2));

    assert!(vec.try_clone().is_err());

    vec.clear();
    vec.try_shrink_to_fit().expect("Releasing memory doesn't allocate.");
    assert_eq!(vec.cap(), 0);

    alloc.set_failing(false);
    vec.extend([4, 5, 6]);
    drop(vec);
    assert_eq!(alloc.live(), 0, "Every block should have been released.");
}

#[test]
fn test_clone_from_keeps_allocator() {
    let mine = TestAlloc::new();
    let theirs = TestAlloc::new();

    let mut target: Vector<i32, TestAlloc> = Vector::with_cap_in(1, mine.clone());
    target.push(0);
    let mut source: Vector<i32, TestAlloc> = Vector::with_cap_in(5, theirs.clone());
    source.extend([1, 2, 3, 4, 5]);
    assert_eq!((mine.live(), theirs.live()), (1, 1));

    target.clone_from(&source);
    assert_eq!(target, [1, 2, 3, 4, 5]);
    assert_eq!(
        (mine.live(), theirs.live()),
        (1, 1),
        "The copy should be built in the target's allocator and the old block released."
    );

    target.push(6);
    assert_eq!(target, [1, 2, 3, 4, 5, 6]);
    assert_eq!(
        (mine.live(), theirs.live()),
        (1, 1),
        "Growth after assignment should still use the target's allocator."
    );
    assert_eq!(source, [1, 2, 3, 4, 5]);

    mine.set_failing(true);
    assert_panics!({
        target.clone_from(&source);
    });
    assert_eq!(
        target,
        [1, 2, 3, 4, 5, 6],
        "Assignment should fail in the target's allocator and leave the target unchanged."
    );
}

#[test]
fn test_capacity_overflow() {
    let mut vec: Vector<u64> = vector![1];
    assert!(matches!(
        vec.try_reserve(usize::MAX),
        Err(ReserveError::CapacityOverflow(_))
    ));
    assert_eq!(vec.cap(), 1);

    assert_panics!({
        Vector::<u64>::with_cap(isize::MAX as usize);
    });
}

#[test]
fn test_insert_remove() {
    let mut vec = Vector::from_iter_sized(0..3);
    vec.insert(0, 10);
    vec.insert(4, 20);
    vec.insert(2, 30);
    assert_eq!(vec, [10, 0, 30, 1, 2, 20]);

    assert_eq!(vec.remove(0), 10);
    assert_eq!(vec.remove(4), 20);
    assert_eq!(vec.replace(1, 40), 30);
    assert_eq!(vec, [0, 40, 1, 2]);

    assert_panics!({
        vec.insert(5, 0);
    });
    assert_panics!({
        vec.remove(4);
    });
    assert_eq!(vec, [0, 40, 1, 2]);
}

#[test]
fn test_append_and_extend() {
    let mut a = vector![String::from("a")];
    let mut b = vector![String::from("b"), String::from("c")];
    a.append(&mut b);
    assert_eq!(a, ["a", "b", "c"]);
    assert!(b.is_empty());
    assert_eq!(b.cap(), 2, "The drained Vector should keep its capacity.");

    a.extend_from_slice(&[String::from("d")]);
    assert_eq!(a.len(), 4);

    let mut nums: Vector<i32> = Vector::new();
    nums.extend(&[1, 2, 3]);
    nums.extend(4..6);
    assert_eq!(nums, [1, 2, 3, 4, 5]);
}

#[test]
fn test_swap() {
    let mut a: Vector<i32> = Vector::with_cap(8);
    a.extend([1, 2]);
    let ptr = a.as_ptr();

    let mut b = vector![3];
    a.swap(&mut b);
    assert_eq!((a.len(), a.cap()), (1, 1));
    assert_eq!((b.len(), b.cap()), (2, 8));
    assert_eq!(b.as_ptr(), ptr, "Swapping shouldn't move any elements.");
}

#[test]
fn test_drop() {
    let counter = CountedDrop::new(0);
    let mut vec = Vector::from_fn(10, |_| counter.clone());

    vec.truncate(7);
    assert_eq!(counter.take(), 3, "Truncating should drop the trailing elements.");

    drop(vec.pop());
    assert_eq!(counter.take(), 1);

    drop(vec);
    assert_eq!(counter.take(), 6, "Dropping should drop every remaining element.");
}

#[test]
fn test_iterators() {
    let mut vec = Vector::from_iter_sized(0_usize..5);
    for i in vec.iter_mut() {
        *i *= 2;
    }
    assert_eq!(vec, [0, 2, 4, 6, 8]);
    assert_eq!(vec.iter().rev().copied().collect::<Vector<_>>(), [8, 6, 4, 2, 0]);

    let mut iter = vec.into_iter();
    assert_eq!(iter.len(), 5);
    assert_eq!(iter.next(), Some(0));
    assert_eq!(iter.next_back(), Some(8));
    assert_eq!(iter.as_slice(), &[2, 4, 6]);
    assert_eq!(iter.next(), Some(2));
    assert_eq!(iter.next_back(), Some(6));
    assert_eq!(iter.next(), Some(4));
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next_back(), None);

    let counter = CountedDrop::new(0);
    let vec = Vector::from_fn(10, |_| counter.clone());
    let mut iter = vec.into_iter();
    iter.next();
    iter.next_back();
    assert_eq!(counter.take(), 2);
    drop(iter);
    assert_eq!(counter.take(), 8, "Dropping an owned iterator should drop the rest.");
}

#[test]
fn test_zst_support() {
    let alloc = TestAlloc::new();
    let mut vec = Vector::new_in(alloc.clone());
    for _ in 0..10 {
        vec.push(ZeroSizedType);
    }

    assert_eq!(vec.len(), 10);
    assert_eq!(vec.cap(), 16);
    assert_eq!(vec[9], ZeroSizedType);
    vec.shrink_to_fit();
    assert_eq!(vec.cap(), 10);
    assert_eq!(alloc.allocations(), 0, "ZSTs should never allocate.");
}

#[test]
fn test_equality_and_hash() {
    let vec = Vector::from_iter_sized(0_usize..5);
    assert_eq!(vec, Vector::from([0, 1, 2, 3, 4]));
    assert_eq!(vec, Vector::from(&[0, 1, 2, 3, 4][..]));
    assert_eq!(vec, &[0, 1, 2, 3, 4][..]);

    let other_alloc = Vector::from_iter_sized_in(0_usize..5, TestAlloc::new());
    assert_eq!(vec, other_alloc, "Equality shouldn't depend on the allocator.");

    let state = RandomState::new();
    assert_eq!(
        state.hash_one(&vec),
        state.hash_one([0_usize, 1, 2, 3, 4]),
        "Borrow hash equality should be upheld."
    );
}

#[test]
fn test_formatting() {
    let vec = vector![1, 2, 3];
    assert_eq!(vec.to_string(), "[1, 2, 3]");
    assert_eq!(format!("{:?}", vec), "Vector { contents: [1, 2, 3], len: 3, cap: 3 }");
    assert_eq!(Vector::<u8>::new().to_string(), "[]");
    assert_eq!(vector![1.5, 2.25].to_string(), "[1.5, 2.25]");
}

#[test]
fn test_std_conversion() {
    let vec: Vec<_> = vector![1, 2, 3].into();
    assert_eq!(vec, [1, 2, 3]);

    let back = Vector::from(vec);
    assert_eq!(back, [1, 2, 3]);
    assert_eq!(back.cap(), 3);

    let empty = Vector::from(Vec::<String>::new());
    assert_eq!((empty.len(), empty.cap()), (0, 0));
}

#[test]
fn test_against_model() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut model: Vec<i32> = Vec::new();
    let mut vec: Vector<i32> = Vector::new();

    for _ in 0..5000 {
        match rng.gen_range(0..10) {
            0..=3 => {
                let value = rng.gen_range(-1000..1000);
                model.push(value);
                vec.push(value);
            },
            4 => assert_eq!(vec.pop(), model.pop()),
            5 => {
                let index = rng.gen_range(0..=model.len());
                model.insert(index, -1);
                vec.insert(index, -1);
            },
            6 if !model.is_empty() => {
                let index = rng.gen_range(0..model.len());
                assert_eq!(vec.remove(index), model.remove(index));
            },
            7 => {
                let len = rng.gen_range(0..=model.len() + 4);
                model.resize(len, 0);
                vec.resize(len, 0);
            },
            8 => {
                let cap = rng.gen_range(0..64);
                vec.reserve(cap);
                assert!(vec.cap() >= cap);
            },
            _ => vec.shrink_to_fit(),
        }

        assert_eq!(vec, model.as_slice());
        assert!(vec.len() <= vec.cap(), "Length should never exceed capacity.");
    }
}
