//! Criterion micro-benchmarks for list construction, traversal and copying.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use nook_arena::{StackAllocator, StackStorage};
use nook_bench::{fill_profile, PROFILE_CAPACITY, PROFILE_LEN};
use nook_list::List;

fn bench_push_back_stack(c: &mut Criterion) {
    c.bench_function("push_back_stack_256", |b| {
        b.iter(|| {
            let storage = StackStorage::<PROFILE_CAPACITY>::new();
            let mut list = List::new_in(StackAllocator::new(&storage));
            fill_profile(&mut list).unwrap();
            black_box(list.len());
        });
    });
}

fn bench_push_back_heap(c: &mut Criterion) {
    c.bench_function("push_back_heap_256", |b| {
        b.iter(|| {
            let mut list = List::new();
            fill_profile(&mut list).unwrap();
            black_box(list.len());
        });
    });
}

fn bench_iterate(c: &mut Criterion) {
    let storage = StackStorage::<PROFILE_CAPACITY>::new();
    let mut list = List::new_in(StackAllocator::new(&storage));
    fill_profile(&mut list).unwrap();
    c.bench_function("iterate_sum_256", |b| {
        b.iter(|| black_box(list.iter().fold(0u64, |acc, v| acc.wrapping_add(*v))));
    });
    c.bench_function("iterate_rev_sum_256", |b| {
        b.iter(|| black_box(list.iter().rev().fold(0u64, |acc, v| acc.wrapping_add(*v))));
    });
}

fn bench_try_clone(c: &mut Criterion) {
    let mut source = List::new();
    fill_profile(&mut source).unwrap();
    c.bench_function("copy_heap_into_stack_256", |b| {
        b.iter(|| {
            let storage = StackStorage::<PROFILE_CAPACITY>::new();
            let copy = source.iter().copied();
            let mut list = List::new_in(StackAllocator::new(&storage));
            list.try_extend(copy).unwrap();
            black_box(list.len());
        });
    });
    c.bench_function("try_clone_heap_256", |b| {
        b.iter(|| black_box(source.try_clone().unwrap().len()));
    });
}

fn bench_cursor_insert_middle(c: &mut Criterion) {
    c.bench_function("cursor_insert_middle_256", |b| {
        b.iter(|| {
            let storage = StackStorage::<PROFILE_CAPACITY>::new();
            let mut list = List::new_in(StackAllocator::new(&storage));
            list.push_back(0u64).unwrap();
            list.push_back(u64::MAX).unwrap();
            let mut cursor = list.cursor_back_mut();
            for i in 0..(PROFILE_LEN as u64 - 2) {
                cursor.insert(i).unwrap();
                cursor.move_next();
            }
            black_box(list.len());
        });
    });
}

criterion_group!(
    benches,
    bench_push_back_stack,
    bench_push_back_heap,
    bench_iterate,
    bench_try_clone,
    bench_cursor_insert_middle
);
criterion_main!(benches);
