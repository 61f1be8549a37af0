//! Minimal protobuf writers for dag-pb nodes and UnixFS data.
//!
//! Only the encodings needed to address files and single-entry directories
//! are implemented. Field order follows the canonical dag-pb form: every
//! `Links` entry precedes `Data`, and each link writes `Hash`, `Name`, `Tsize`
//! in that order with `Name` always present.

use crate::cid::ContentId;
use crate::varint::encode_varint;

const WIRE_VARINT: u64 = 0;
const WIRE_LEN: u64 = 2;

// PBNode
const NODE_DATA: u64 = 1;
const NODE_LINKS: u64 = 2;

// PBLink
const LINK_HASH: u64 = 1;
const LINK_NAME: u64 = 2;
const LINK_TSIZE: u64 = 3;

// UnixFS Data
const UNIXFS_TYPE: u64 = 1;
const UNIXFS_FILESIZE: u64 = 3;
const UNIXFS_BLOCKSIZES: u64 = 4;

/// UnixFS node types used here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub(crate) enum UnixFsType {
    Directory = 1,
    File = 2,
}

/// One outbound link of a dag-pb node.
#[derive(Clone, Debug)]
pub(crate) struct PbLink<'a> {
    pub hash: ContentId,
    pub name: &'a str,
    /// Cumulative encoded size of the linked subtree.
    pub tsize: u64,
}

fn put_varint_field(buf: &mut Vec<u8>, field: u64, value: u64) {
    encode_varint(buf, (field << 3) | WIRE_VARINT);
    encode_varint(buf, value);
}

fn put_bytes_field(buf: &mut Vec<u8>, field: u64, bytes: &[u8]) {
    encode_varint(buf, (field << 3) | WIRE_LEN);
    encode_varint(buf, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

fn encode_link(link: &PbLink<'_>) -> Vec<u8> {
    let mut buf = Vec::with_capacity(48 + link.name.len());
    put_bytes_field(&mut buf, LINK_HASH, &link.hash.to_bytes());
    put_bytes_field(&mut buf, LINK_NAME, link.name.as_bytes());
    put_varint_field(&mut buf, LINK_TSIZE, link.tsize);
    buf
}

/// Encode a dag-pb node.
pub(crate) fn encode_node(links: &[PbLink<'_>], data: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    for link in links {
        put_bytes_field(&mut buf, NODE_LINKS, &encode_link(link));
    }
    put_bytes_field(&mut buf, NODE_DATA, data);
    buf
}

/// UnixFS data for an internal file node with the given child sizes.
///
/// `filesize` is the sum of the child sizes; the node carries no inline data.
pub(crate) fn unixfs_file_data(blocksizes: &[u64]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4 + blocksizes.len() * 4);
    put_varint_field(&mut buf, UNIXFS_TYPE, UnixFsType::File as u64);
    put_varint_field(&mut buf, UNIXFS_FILESIZE, blocksizes.iter().sum());
    for &size in blocksizes {
        put_varint_field(&mut buf, UNIXFS_BLOCKSIZES, size);
    }
    buf
}

/// UnixFS data for a plain (non-sharded) directory.
pub(crate) fn unixfs_directory_data() -> Vec<u8> {
    let mut buf = Vec::with_capacity(2);
    put_varint_field(&mut buf, UNIXFS_TYPE, UnixFsType::Directory as u64);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cid::Codec;

    #[test]
    fn directory_data_bytes() {
        assert_eq!(unixfs_directory_data(), [0x08, 0x01]);
    }

    #[test]
    fn empty_directory_node() {
        let node = encode_node(&[], &unixfs_directory_data());
        assert_eq!(node, [0x0a, 0x02, 0x08, 0x01]);
        assert_eq!(
            ContentId::hash(Codec::DagPb, &node).to_string(),
            "bafybeiczsscdsbs7ffqz55asqdf3smv6klcw3gofszvwlyarci47bgf354"
        );
    }

    #[test]
    fn file_data_lists_blocksizes() {
        let data = unixfs_file_data(&[262_144, 10]);
        // type=file, filesize=262154, blocksizes 262144 and 10
        assert_eq!(
            data,
            [0x08, 0x02, 0x18, 0x8a, 0x80, 0x10, 0x20, 0x80, 0x80, 0x10, 0x20, 0x0a]
        );
    }

    #[test]
    fn links_precede_data_and_keep_empty_name() {
        let child = ContentId::hash(Codec::Raw, b"leaf");
        let node = encode_node(
            &[PbLink {
                hash: child,
                name: "",
                tsize: 4,
            }],
            &[0x08, 0x02],
        );
        // Links field tag, then the link body: hash(36 bytes), empty name, tsize.
        assert_eq!(node[0], 0x12);
        assert_eq!(node[1] as usize, 2 + 36 + 2 + 2);
        assert_eq!(&node[2..4], &[0x0a, 36]);
        assert_eq!(&node[40..44], &[0x12, 0x00, 0x18, 0x04]);
        assert_eq!(&node[44..], &[0x0a, 0x02, 0x08, 0x02]);
    }
}
