//! Binary Merkle tree over Keccak-256 digests.
//!
//! Leaves and internal nodes are domain-separated by a one-byte tag so a
//! leaf digest can never be replayed as an internal node. Trees are always
//! built over a power-of-two number of leaves (the evaluation domains are
//! radix-2), so no padding rules are needed.

use crate::errors::{PlonkError, Result};
use sha3::{Digest, Keccak256};

const LEAF_TAG: u8 = 0x00;
const NODE_TAG: u8 = 0x01;

/// A 32-byte Merkle root or node digest.
pub type Hash = [u8; 32];

/// Hash a leaf payload.
pub fn hash_leaf(payload: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update([LEAF_TAG]);
    hasher.update(payload);
    hasher.finalize().into()
}

fn hash_node(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update([NODE_TAG]);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Authentication path for a single leaf, bottom-up sibling digests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerklePath {
    /// Sibling digests from the leaf level to just below the root.
    pub siblings: Vec<Hash>,
}

/// Fully materialised binary Merkle tree.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    levels: Vec<Vec<Hash>>,
}

impl MerkleTree {
    /// Build a tree over the given leaf digests. The leaf count must be a
    /// power of two.
    pub fn new(leaves: Vec<Hash>) -> Result<Self> {
        if leaves.is_empty() || !leaves.len().is_power_of_two() {
            return Err(PlonkError::FuncParamsError);
        }
        let mut levels = vec![leaves];
        while levels.last().map_or(0, |l| l.len()) > 1 {
            let current = levels.last().expect("nonempty levels");
            let next: Vec<Hash> = current
                .chunks(2)
                .map(|pair| hash_node(&pair[0], &pair[1]))
                .collect();
            levels.push(next);
        }
        Ok(Self { levels })
    }

    /// Return the root digest.
    pub fn root(&self) -> Hash {
        self.levels.last().expect("nonempty levels")[0]
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Authentication path for the leaf at `index`.
    pub fn open(&self, mut index: usize) -> Result<MerklePath> {
        if index >= self.leaf_count() {
            return Err(PlonkError::IndexOutOfBounds);
        }
        let mut siblings = Vec::with_capacity(self.levels.len() - 1);
        for level in &self.levels[..self.levels.len() - 1] {
            siblings.push(level[index ^ 1]);
            index >>= 1;
        }
        Ok(MerklePath { siblings })
    }
}

/// Recompute the root implied by a leaf digest and its authentication path,
/// and compare against the expected root.
pub fn verify_path(root: &Hash, mut index: usize, leaf: &Hash, path: &MerklePath) -> bool {
    let mut current = *leaf;
    for sibling in path.siblings.iter() {
        current = if index & 1 == 0 {
            hash_node(&current, sibling)
        } else {
            hash_node(sibling, &current)
        };
        index >>= 1;
    }
    index == 0 && current == *root
}

#[cfg(test)]
mod test {
    use super::*;

    fn leaves(n: usize) -> Vec<Hash> {
        (0..n).map(|i| hash_leaf(&(i as u64).to_be_bytes())).collect()
    }

    #[test]
    fn open_and_verify_all_leaves() {
        let leaves = leaves(16);
        let tree = MerkleTree::new(leaves.clone()).unwrap();
        let root = tree.root();
        for (i, leaf) in leaves.iter().enumerate() {
            let path = tree.open(i).unwrap();
            assert!(verify_path(&root, i, leaf, &path));
        }
    }

    #[test]
    fn reject_wrong_leaf_and_wrong_index() {
        let leaves = leaves(8);
        let tree = MerkleTree::new(leaves.clone()).unwrap();
        let root = tree.root();
        let path = tree.open(3).unwrap();
        let forged = hash_leaf(b"forged");
        assert!(!verify_path(&root, 3, &forged, &path));
        assert!(!verify_path(&root, 4, &leaves[3], &path));
    }

    #[test]
    fn reject_non_power_of_two() {
        assert!(MerkleTree::new(leaves(6)).is_err());
        assert!(MerkleTree::new(vec![]).is_err());
    }
}
