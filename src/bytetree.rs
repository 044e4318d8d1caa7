//! Canonical byte-tree serialization.
//!
//! Every persistable object in the library is represented as a byte tree: a
//! recursive structure whose leaves carry raw bytes and whose nodes carry an
//! ordered sequence of children. The wire form is deterministic and
//! length-framed, so a well-formed tree round-trips to identical bytes and
//! two independent implementations agree bit for bit.
//!
//! Wire form (big-endian throughout): one tag byte (`0x01` leaf, `0x00`
//! node), a four-byte length (bytes of a leaf, children of a node), then the
//! payload.

use crate::config;
use crate::error::{Result, UrnaCryptoError};

/// Wire tag of a node.
pub const NODE_TAG: u8 = 0;

/// Wire tag of a leaf.
pub const LEAF_TAG: u8 = 1;

/// A recursive, self-describing container of bytes.
///
/// This is the canonical serialization format of the library: leaves hold a
/// payload of up to `i32::MAX` bytes, nodes hold an ordered sequence of
/// child trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ByteTree {
    /// Raw payload bytes.
    Leaf(Vec<u8>),
    /// Ordered children.
    Node(Vec<ByteTree>),
}

impl ByteTree {
    /// Create a leaf holding `bytes`.
    pub fn leaf(bytes: impl Into<Vec<u8>>) -> Self {
        ByteTree::Leaf(bytes.into())
    }

    /// Create a node holding `children` in order.
    pub fn node(children: Vec<ByteTree>) -> Self {
        ByteTree::Node(children)
    }

    /// Create a leaf holding a 32-bit integer as four big-endian bytes.
    pub fn int_leaf(value: i32) -> Self {
        ByteTree::Leaf(value.to_be_bytes().to_vec())
    }

    /// Create a leaf holding a UTF-8 string.
    pub fn string_leaf(value: &str) -> Self {
        ByteTree::Leaf(value.as_bytes().to_vec())
    }

    /// Total number of bytes of the wire encoding.
    pub fn encoded_length(&self) -> usize {
        match self {
            ByteTree::Leaf(bytes) => config::MIN_ENCODED_TREE_BYTES + bytes.len(),
            ByteTree::Node(children) => {
                config::MIN_ENCODED_TREE_BYTES
                    + children.iter().map(ByteTree::encoded_length).sum::<usize>()
            }
        }
    }

    /// Serialize to the canonical wire form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_length());
        self.write_into(&mut out);
        out
    }

    fn write_into(&self, out: &mut Vec<u8>) {
        match self {
            ByteTree::Leaf(bytes) => {
                out.push(LEAF_TAG);
                out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
                out.extend_from_slice(bytes);
            }
            ByteTree::Node(children) => {
                out.push(NODE_TAG);
                out.extend_from_slice(&(children.len() as u32).to_be_bytes());
                for child in children {
                    child.write_into(out);
                }
            }
        }
    }

    /// Deserialize a byte tree from its canonical wire form.
    ///
    /// The full input must be consumed: trailing bytes after a complete
    /// tree are rejected. Any declared length that exceeds the remaining
    /// input, an unknown tag, or nesting deeper than
    /// [`config::MAX_BYTE_TREE_DEPTH`] yields a format error. Malformed
    /// input never panics.
    pub fn from_bytes(bytes: &[u8]) -> Result<ByteTree> {
        let mut pos = 0;
        let tree = Self::parse(bytes, &mut pos, 0)?;
        if pos != bytes.len() {
            return Err(UrnaCryptoError::MalformedTree(format!(
                "{} trailing bytes after complete tree",
                bytes.len() - pos
            )));
        }
        Ok(tree)
    }

    fn parse(bytes: &[u8], pos: &mut usize, depth: usize) -> Result<ByteTree> {
        if depth > config::MAX_BYTE_TREE_DEPTH {
            return Err(UrnaCryptoError::MalformedTree(format!(
                "nesting exceeds maximum depth of {}",
                config::MAX_BYTE_TREE_DEPTH
            )));
        }

        let tag = *bytes
            .get(*pos)
            .ok_or_else(|| UrnaCryptoError::MalformedTree("missing tag byte".to_string()))?;
        let header_end = *pos + config::MIN_ENCODED_TREE_BYTES;
        let length_bytes = bytes.get(*pos + 1..header_end).ok_or_else(|| {
            UrnaCryptoError::MalformedTree("truncated length field".to_string())
        })?;
        let length = u32::from_be_bytes(
            length_bytes
                .try_into()
                .expect("slice of checked length is four bytes"),
        ) as usize;
        if length > config::MAX_WIRE_LENGTH {
            return Err(UrnaCryptoError::MalformedTree(format!(
                "length field {} exceeds the 31-bit wire maximum",
                length
            )));
        }
        *pos = header_end;

        match tag {
            LEAF_TAG => {
                let remaining = bytes.len() - *pos;
                if length > remaining {
                    return Err(UrnaCryptoError::MalformedTree(format!(
                        "leaf declares {} bytes but only {} remain",
                        length, remaining
                    )));
                }
                let payload = bytes[*pos..*pos + length].to_vec();
                *pos += length;
                Ok(ByteTree::Leaf(payload))
            }
            NODE_TAG => {
                // Every child occupies at least a header, so the declared
                // count is bounded by the remaining input before any child
                // is parsed.
                let remaining = bytes.len() - *pos;
                if length > remaining / config::MIN_ENCODED_TREE_BYTES {
                    return Err(UrnaCryptoError::MalformedTree(format!(
                        "node declares {} children but only {} bytes remain",
                        length, remaining
                    )));
                }
                let mut children = Vec::with_capacity(length);
                for _ in 0..length {
                    children.push(Self::parse(bytes, pos, depth + 1)?);
                }
                Ok(ByteTree::Node(children))
            }
            other => Err(UrnaCryptoError::MalformedTree(format!(
                "unknown tag byte {:#04x}",
                other
            ))),
        }
    }

    /// Open a single-pass reader over this tree.
    pub fn reader(&self) -> ByteTreeReader<'_> {
        ByteTreeReader::new(self)
    }

    /// Borrow the payload of a leaf, or fail with a format error.
    pub(crate) fn leaf_bytes(&self) -> Result<&[u8]> {
        match self {
            ByteTree::Leaf(bytes) => Ok(bytes),
            ByteTree::Node(_) => Err(UrnaCryptoError::MalformedTree(
                "expected a leaf, found a node".to_string(),
            )),
        }
    }

    /// Borrow the children of a node, or fail with a format error.
    pub(crate) fn children(&self) -> Result<&[ByteTree]> {
        match self {
            ByteTree::Node(children) => Ok(children),
            ByteTree::Leaf(_) => Err(UrnaCryptoError::MalformedTree(
                "expected a node, found a leaf".to_string(),
            )),
        }
    }

    /// Borrow the children of a node and check the exact count.
    pub(crate) fn children_exact(&self, count: usize) -> Result<&[ByteTree]> {
        let children = self.children()?;
        if children.len() != count {
            return Err(UrnaCryptoError::MalformedTree(format!(
                "expected a node with {} children, found {}",
                count,
                children.len()
            )));
        }
        Ok(children)
    }

    /// Read a 32-bit big-endian integer out of a four-byte leaf.
    pub(crate) fn int_value(&self) -> Result<i32> {
        let bytes = self.leaf_bytes()?;
        let array: [u8; 4] = bytes.try_into().map_err(|_| {
            UrnaCryptoError::MalformedTree(format!(
                "expected a four-byte integer leaf, found {} bytes",
                bytes.len()
            ))
        })?;
        Ok(i32::from_be_bytes(array))
    }
}

/// A consuming cursor over one byte tree.
///
/// For a node the reader walks the children in order; for a leaf it walks
/// the payload bytes. Readers are single-pass: there is no rewind, and a
/// child reader is independent of its parent's position.
#[derive(Debug)]
pub struct ByteTreeReader<'a> {
    tree: &'a ByteTree,
    position: usize,
}

impl<'a> ByteTreeReader<'a> {
    fn new(tree: &'a ByteTree) -> Self {
        ByteTreeReader { tree, position: 0 }
    }

    /// Children not yet visited (node) or bytes not yet consumed (leaf).
    pub fn remaining(&self) -> usize {
        match self.tree {
            ByteTree::Leaf(bytes) => bytes.len().saturating_sub(self.position),
            ByteTree::Node(children) => children.len().saturating_sub(self.position),
        }
    }

    /// Open a reader over the next unvisited child of this node.
    pub fn next_child(&mut self) -> Result<ByteTreeReader<'a>> {
        let children = self.tree.children()?;
        let child = children.get(self.position).ok_or_else(|| {
            UrnaCryptoError::MalformedTree("no children remain".to_string())
        })?;
        self.position += 1;
        Ok(ByteTreeReader::new(child))
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.tree.leaf_bytes()?;
        let end = self.position + count;
        if end > bytes.len() {
            return Err(UrnaCryptoError::MalformedTree(format!(
                "read of {} bytes exceeds the {} remaining",
                count,
                bytes.len() - self.position
            )));
        }
        let slice = &bytes[self.position..end];
        self.position = end;
        Ok(slice)
    }

    /// Consume exactly four bytes as a big-endian signed integer.
    pub fn read_int(&mut self) -> Result<i32> {
        let bytes = self.take(4)?;
        Ok(i32::from_be_bytes(
            bytes.try_into().expect("take returned four bytes"),
        ))
    }

    /// Consume the remaining bytes as a UTF-8 string.
    pub fn read_string(&mut self) -> Result<String> {
        let bytes = self.take(self.remaining())?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| UrnaCryptoError::MalformedTree(format!("invalid UTF-8: {}", e)))
    }

    /// Consume the remaining bytes.
    pub fn read(&mut self) -> Result<Vec<u8>> {
        Ok(self.take(self.remaining())?.to_vec())
    }

    /// Release the reader. The reader holds no external buffers, so this
    /// is a no-op kept for interface symmetry.
    pub fn close(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_wire_form() {
        let tree = ByteTree::leaf(b"abc".to_vec());
        assert_eq!(tree.to_bytes(), vec![0x01, 0x00, 0x00, 0x00, 0x03, 0x61, 0x62, 0x63]);
    }

    #[test]
    fn test_node_wire_form() {
        let tree = ByteTree::node(vec![ByteTree::leaf(vec![0xaa]), ByteTree::leaf(vec![])]);
        assert_eq!(
            tree.to_bytes(),
            vec![
                0x00, 0x00, 0x00, 0x00, 0x02, // node, two children
                0x01, 0x00, 0x00, 0x00, 0x01, 0xaa, // first leaf
                0x01, 0x00, 0x00, 0x00, 0x00, // empty leaf
            ]
        );
    }

    #[test]
    fn test_round_trip() {
        let tree = ByteTree::node(vec![
            ByteTree::int_leaf(-7),
            ByteTree::node(vec![ByteTree::string_leaf("inner"), ByteTree::leaf(vec![0; 300])]),
            ByteTree::leaf(b"tail".to_vec()),
        ]);
        let bytes = tree.to_bytes();
        assert_eq!(ByteTree::from_bytes(&bytes).unwrap(), tree);
    }

    #[test]
    fn test_reader_over_leaf() {
        let tree = ByteTree::node(vec![ByteTree::int_leaf(300), ByteTree::string_leaf("abc")]);
        let mut reader = tree.reader();
        assert_eq!(reader.remaining(), 2);

        let mut first = reader.next_child().unwrap();
        assert_eq!(first.remaining(), 4);
        assert_eq!(first.read_int().unwrap(), 300);
        assert_eq!(first.remaining(), 0);

        let mut second = reader.next_child().unwrap();
        assert_eq!(second.read_string().unwrap(), "abc");
        assert!(reader.next_child().is_err());
    }

    #[test]
    fn test_truncated_input_rejected() {
        let bytes = ByteTree::leaf(vec![1, 2, 3, 4]).to_bytes();
        for cut in 0..bytes.len() {
            assert!(
                ByteTree::from_bytes(&bytes[..cut]).is_err(),
                "prefix of {} bytes should be rejected",
                cut
            );
        }
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = ByteTree::leaf(vec![1]).to_bytes();
        bytes.push(0);
        assert!(ByteTree::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_overlong_declared_lengths_rejected() {
        // Leaf declaring more bytes than remain
        assert!(ByteTree::from_bytes(&[0x01, 0x7f, 0xff, 0xff, 0xff]).is_err());
        // Node declaring an absurd child count
        assert!(ByteTree::from_bytes(&[0x00, 0x7f, 0xff, 0xff, 0xff]).is_err());
        // Unknown tag
        assert!(ByteTree::from_bytes(&[0x02, 0x00, 0x00, 0x00, 0x00]).is_err());
    }

    #[test]
    fn test_deep_nesting_rejected() {
        let mut bytes = Vec::new();
        for _ in 0..(config::MAX_BYTE_TREE_DEPTH + 2) {
            bytes.extend_from_slice(&[NODE_TAG, 0, 0, 0, 1]);
        }
        bytes.extend_from_slice(&[LEAF_TAG, 0, 0, 0, 0]);
        assert!(ByteTree::from_bytes(&bytes).is_err());
    }
}
