use std::{collections::BTreeMap, hint::black_box};

use rb_tree::RBTree;

fn main() {
    divan::main();
}

fn lens() -> impl Iterator<Item = u32> {
    (0..18).map(|i| 1 << i)
}

trait KeyGen: Default {
    fn gen_key(&mut self, len: u32) -> u32;
}

#[derive(Default)]
struct Seq(u32);
impl KeyGen for Seq {
    fn gen_key(&mut self, _len: u32) -> u32 {
        let key = self.0;
        self.0 += 1;
        key
    }
}

#[derive(Default)]
struct Rand(u32);
impl KeyGen for Rand {
    fn gen_key(&mut self, len: u32) -> u32 {
        let key = self.0;
        self.0 = self.0.wrapping_mul(1664525).wrapping_add(1013904223);
        key % len
    }
}

fn filled(len: u32) -> RBTree<u32, u32> {
    let mut tree = RBTree::new();
    for i in 0..len {
        tree.insert(i, 0);
    }
    tree
}

#[divan::bench(args = lens(), types = [Seq, Rand])]
fn lookup_rbtree<K: KeyGen>(bencher: divan::Bencher, len: u32) {
    let tree = filled(len);
    bencher.bench_local(|| {
        let mut k = K::default();
        for _ in 0..len {
            let key = k.gen_key(len);
            black_box(tree.get(&black_box(key)));
        }
    });
}

#[divan::bench(args = lens(), types = [Seq, Rand])]
fn lookup_std<K: KeyGen>(bencher: divan::Bencher, len: u32) {
    let mut btree = BTreeMap::new();
    for i in 0..len {
        btree.insert(i, 0u32);
    }
    bencher.bench_local(|| {
        let mut k = K::default();
        for _ in 0..len {
            let key = k.gen_key(len);
            black_box(btree.get(&black_box(key)));
        }
    });
}

#[divan::bench(args = lens(), types = [Seq, Rand])]
fn insert_rbtree<K: KeyGen>(bencher: divan::Bencher, len: u32) {
    bencher.bench_local(|| {
        let mut tree = RBTree::new();
        let mut k = K::default();
        for _ in 0..len {
            let key = k.gen_key(len);
            tree.insert(key, key);
        }
        tree
    });
}

#[divan::bench(args = lens(), types = [Seq, Rand])]
fn insert_rbtree_reuse<K: KeyGen>(bencher: divan::Bencher, len: u32) {
    let mut tree = RBTree::new();
    bencher.bench_local(|| {
        tree.clear();
        let mut k = K::default();
        for _ in 0..len {
            let key = k.gen_key(len);
            tree.insert(key, key);
        }
        divan::black_box(&tree);
    });
}

#[divan::bench(args = lens(), types = [Seq, Rand])]
fn insert_std<K: KeyGen>(bencher: divan::Bencher, len: u32) {
    bencher.bench_local(|| {
        let mut btree = BTreeMap::new();
        let mut k = K::default();
        for _ in 0..len {
            let key = k.gen_key(len);
            btree.insert(key, key);
        }
        btree
    });
}

#[divan::bench(args = lens(), types = [Seq, Rand])]
fn erase_rbtree<K: KeyGen>(bencher: divan::Bencher, len: u32) {
    bencher
        .with_inputs(|| filled(len))
        .bench_local_values(|mut tree| {
            let mut k = K::default();
            for _ in 0..len {
                let key = k.gen_key(len);
                let cursor = tree.find(&key);
                let _ = black_box(tree.erase(cursor));
            }
            tree
        });
}

#[divan::bench(args = lens(), types = [Seq, Rand])]
fn remove_std<K: KeyGen>(bencher: divan::Bencher, len: u32) {
    bencher
        .with_inputs(|| (0..len).map(|i| (i, 0u32)).collect::<BTreeMap<_, _>>())
        .bench_local_values(|mut btree| {
            let mut k = K::default();
            for _ in 0..len {
                let key = k.gen_key(len);
                black_box(btree.remove(&key));
            }
            btree
        });
}

#[divan::bench(args = lens())]
fn iter_rbtree(bencher: divan::Bencher, len: u32) {
    let tree = filled(len);
    bencher.bench_local(|| {
        for (k, v) in &tree {
            divan::black_box((k, v));
        }
    });
}

#[divan::bench(args = lens())]
fn iter_rbtree_rev(bencher: divan::Bencher, len: u32) {
    let tree = filled(len);
    bencher.bench_local(|| {
        for (k, v) in tree.iter().rev() {
            divan::black_box((k, v));
        }
    });
}

#[divan::bench(args = lens())]
fn iter_std(bencher: divan::Bencher, len: u32) {
    let mut btree = BTreeMap::new();
    for i in 0..len {
        btree.insert(i, 0u32);
    }
    bencher.bench_local(|| {
        for (k, v) in &btree {
            divan::black_box((k, v));
        }
    });
}

#[divan::bench(args = lens())]
fn iter_cursor(bencher: divan::Bencher, len: u32) {
    let tree = filled(len);
    bencher.bench_local(|| {
        let mut cursor = tree.begin();
        while let Ok(entry) = tree.entry(&cursor) {
            divan::black_box(entry);
            let _ = tree.next(&mut cursor);
        }
    });
}

#[divan::bench(args = lens())]
fn iter_cursor_rev(bencher: divan::Bencher, len: u32) {
    let tree = filled(len);
    bencher.bench_local(|| {
        let mut cursor = tree.end();
        while tree.prev(&mut cursor).is_ok() && !cursor.is_end() {
            divan::black_box(tree.entry(&cursor));
        }
    });
}
