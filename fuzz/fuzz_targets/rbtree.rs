#![no_main]

use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rb_tree::{Error, RBTree};

#[derive(Arbitrary, Debug)]
enum Action<Key, Value> {
    Clear,
    Insert(Key, Value),
    Get(Key),
    Remove(Key),
    Erase(Key),
    PopFirst,
    PopLast,
    Cursor(Start<Key>, Vec<CursorAction>),
}

#[derive(Arbitrary, Debug)]
enum Start<Key> {
    Begin,
    End,
    RBegin,
    REnd,
    Find(Key),
}

#[derive(Arbitrary, Debug)]
enum CursorAction {
    Next,
    Prev,
    Erase,
}

/// Where the model expects the cursor to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Position {
    At(usize),
    PastEnd,
    PastFront,
}

#[derive(Arbitrary, Debug)]
enum KeyType<Value> {
    U8(Vec<Action<u8, Value>>),
    U16(Vec<Action<u16, Value>>),
    I32(Vec<Action<i32, Value>>),
    U64(Vec<Action<u64, Value>>),
}

#[derive(Arbitrary, Debug)]
enum ValueType {
    Empty(KeyType<()>),
    U8(KeyType<u8>),
    U32(KeyType<u32>),
}

fn run<'a, Key, Value>(actions: Vec<Action<Key, Value>>)
where
    Key: Ord + Copy + Arbitrary<'a> + Debug + Send + Sync + 'static,
    Value: Eq + Copy + Arbitrary<'a> + Debug + Send + Sync + 'static,
{
    let destroyed = Arc::new(AtomicUsize::new(0));
    let mut expected_destroyed = 0;

    {
        let mut tree = RBTree::new();
        let counter = destroyed.clone();
        tree.set_destructor(move |_key: &mut Key, _value: &mut Value| {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        let mut vec: Vec<(Key, Value)> = vec![];

        for action in actions {
            match action {
                Action::Clear => {
                    expected_destroyed += vec.len();
                    tree.clear();
                    vec.clear();
                }
                Action::Insert(key, value) => {
                    let inserted = tree.insert(key, value);
                    let index = vec.partition_point(|&(k, _v)| k < key);
                    if index != vec.len() && vec[index].0 == key {
                        assert!(!inserted);
                    } else {
                        assert!(inserted);
                        vec.insert(index, (key, value));
                    }
                }
                Action::Get(key) => {
                    let value = tree.get(&key);
                    let index = vec.partition_point(|&(k, _v)| k < key);
                    if index != vec.len() && vec[index].0 == key {
                        assert_eq!(value, Some(&vec[index].1));
                    } else {
                        assert_eq!(value, None);
                    }
                }
                Action::Remove(key) => {
                    let value = tree.remove(&key);
                    let index = vec.partition_point(|&(k, _v)| k < key);
                    if index != vec.len() && vec[index].0 == key {
                        assert_eq!(value, Some(vec[index].1));
                        vec.remove(index);
                    } else {
                        assert_eq!(value, None);
                    }
                }
                Action::Erase(key) => {
                    let cursor = tree.find(&key);
                    let index = vec.partition_point(|&(k, _v)| k < key);
                    if index != vec.len() && vec[index].0 == key {
                        let next = tree.erase(cursor).unwrap();
                        vec.remove(index);
                        expected_destroyed += 1;
                        let entry = tree.entry(&next).ok().map(|(&k, &v)| (k, v));
                        assert_eq!(entry, vec.get(index).copied());
                        assert_eq!(tree.key(&cursor), Err(Error::StaleCursor));
                    } else {
                        assert!(cursor.is_end());
                        assert_eq!(tree.erase(cursor), Err(Error::EndCursor));
                    }
                }
                Action::PopFirst => {
                    let entry = tree.pop_first();
                    let expected = (!vec.is_empty()).then(|| vec.remove(0));
                    assert_eq!(entry, expected);
                }
                Action::PopLast => {
                    assert_eq!(tree.pop_last(), vec.pop());
                }
                Action::Cursor(start, actions) => {
                    let (mut cursor, mut pos) = match start {
                        Start::Begin => {
                            let pos = if vec.is_empty() {
                                Position::PastEnd
                            } else {
                                Position::At(0)
                            };
                            (tree.begin(), pos)
                        }
                        Start::End => (tree.end(), Position::PastEnd),
                        Start::RBegin => {
                            let pos = match vec.len() {
                                0 => Position::PastFront,
                                len => Position::At(len - 1),
                            };
                            (tree.rbegin(), pos)
                        }
                        Start::REnd => (tree.rend(), Position::PastFront),
                        Start::Find(key) => {
                            let index = vec.partition_point(|&(k, _v)| k < key);
                            if index != vec.len() && vec[index].0 == key {
                                (tree.find(&key), Position::At(index))
                            } else {
                                (tree.find(&key), Position::PastEnd)
                            }
                        }
                    };
                    // An empty tree has no element to step back onto.
                    if vec.is_empty() {
                        assert!(cursor.is_end());
                        assert_eq!(tree.next(&mut cursor), Err(Error::EndCursor));
                        assert_eq!(tree.prev(&mut cursor), Err(Error::EndCursor));
                        continue;
                    }

                    for action in actions {
                        let len = vec.len();
                        match action {
                            CursorAction::Next => {
                                let result = tree.next(&mut cursor);
                                pos = match pos {
                                    Position::At(i) if i + 1 < len => Position::At(i + 1),
                                    Position::At(_) => Position::PastEnd,
                                    Position::PastFront if len != 0 => Position::At(0),
                                    other => {
                                        assert_eq!(result, Err(Error::EndCursor));
                                        other
                                    }
                                };
                            }
                            CursorAction::Prev => {
                                let result = tree.prev(&mut cursor);
                                pos = match pos {
                                    Position::At(i) if i > 0 => Position::At(i - 1),
                                    Position::At(_) => Position::PastFront,
                                    Position::PastEnd if len != 0 => Position::At(len - 1),
                                    other => {
                                        assert_eq!(result, Err(Error::EndCursor));
                                        other
                                    }
                                };
                            }
                            CursorAction::Erase => match pos {
                                Position::At(i) => {
                                    cursor = tree.erase(cursor).unwrap();
                                    vec.remove(i);
                                    expected_destroyed += 1;
                                    pos = if i < vec.len() {
                                        Position::At(i)
                                    } else {
                                        Position::PastEnd
                                    };
                                }
                                _ => assert_eq!(tree.erase(cursor), Err(Error::EndCursor)),
                            },
                        }

                        tree.assert_valid();
                        match pos {
                            Position::At(i) => {
                                assert_eq!(tree.entry(&cursor).map(|(&k, &v)| (k, v)), Ok(vec[i]));
                                assert_eq!(tree.at_begin(&cursor), i == 0);
                                assert_eq!(tree.at_rbegin(&cursor), i + 1 == vec.len());
                            }
                            Position::PastEnd => {
                                assert!(tree.at_end(&cursor));
                                assert!(!tree.at_rend(&cursor));
                            }
                            Position::PastFront => {
                                assert!(!tree.at_end(&cursor));
                                assert!(tree.at_rend(&cursor));
                            }
                        }
                    }
                }
            }

            tree.assert_valid();
            assert_eq!(vec.len(), tree.len());
            let entries: Vec<_> = tree.iter().map(|(&k, &v)| (k, v)).collect();
            assert_eq!(vec, entries);
            let reversed: Vec<_> = tree.iter().rev().map(|(&k, &v)| (k, v)).collect();
            assert!(reversed.iter().eq(vec.iter().rev()));
            assert_eq!(destroyed.load(Ordering::Relaxed), expected_destroyed);
        }

        expected_destroyed += vec.len();
    }

    assert_eq!(destroyed.load(Ordering::Relaxed), expected_destroyed);
}

fn dispatch_by_key<'a, Value>(actions: KeyType<Value>)
where
    Value: Eq + Copy + Arbitrary<'a> + Debug + Send + Sync + 'static,
{
    match actions {
        KeyType::U8(actions) => run(actions),
        KeyType::U16(actions) => run(actions),
        KeyType::I32(actions) => run(actions),
        KeyType::U64(actions) => run(actions),
    }
}

fuzz_target!(|actions: ValueType| {
    match actions {
        ValueType::Empty(actions) => dispatch_by_key(actions),
        ValueType::U8(actions) => dispatch_by_key(actions),
        ValueType::U32(actions) => dispatch_by_key(actions),
    }
});
