use std::iter::Peekable;
use std::slice::Chunks;

use crate::cid::{Codec, ContentId};
use crate::error::{CidError, CidResult};
use crate::pb::{encode_node, unixfs_directory_data, unixfs_file_data, PbLink};

/// Fixed chunk size for file leaves (1 MiB).
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Maximum links per internal file node in the balanced layout.
pub const MAX_LINKS: usize = 1024;

/// Chunking and fan-out parameters of the file DAG.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DagParams {
    pub chunk_size: usize,
    pub max_links: usize,
}

impl Default for DagParams {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            max_links: MAX_LINKS,
        }
    }
}

/// A node of the file DAG as seen from its parent.
#[derive(Clone, Copy, Debug)]
struct DagNode {
    cid: ContentId,
    /// Encoded size of this node plus every descendant block.
    tsize: u64,
    /// Bytes of file content below this node.
    file_size: u64,
}

fn raw_leaf(chunk: &[u8]) -> DagNode {
    DagNode {
        cid: ContentId::hash(Codec::Raw, chunk),
        tsize: chunk.len() as u64,
        file_size: chunk.len() as u64,
    }
}

fn internal_node(children: &[DagNode]) -> DagNode {
    let links: Vec<PbLink<'_>> = children
        .iter()
        .map(|child| PbLink {
            hash: child.cid,
            name: "",
            tsize: child.tsize,
        })
        .collect();
    let blocksizes: Vec<u64> = children.iter().map(|c| c.file_size).collect();
    let encoded = encode_node(&links, &unixfs_file_data(&blocksizes));

    DagNode {
        cid: ContentId::hash(Codec::DagPb, &encoded),
        tsize: encoded.len() as u64 + children.iter().map(|c| c.tsize).sum::<u64>(),
        file_size: blocksizes.iter().sum(),
    }
}

/// Balanced file layout over fixed-size raw leaves.
///
/// The tree grows upward: the current root becomes the first child of a new
/// root one level deeper, and the remaining slots are filled depth-first.
struct BalancedLayout<'a> {
    chunks: Peekable<Chunks<'a, u8>>,
    max_links: usize,
}

impl<'a> BalancedLayout<'a> {
    fn new(data: &'a [u8], params: DagParams) -> Self {
        Self {
            chunks: data.chunks(params.chunk_size).peekable(),
            max_links: params.max_links,
        }
    }

    fn done(&mut self) -> bool {
        self.chunks.peek().is_none()
    }

    fn fill(&mut self, mut children: Vec<DagNode>, depth: usize) -> DagNode {
        while children.len() < self.max_links && !self.done() {
            let child = if depth == 1 {
                match self.chunks.next() {
                    Some(chunk) => raw_leaf(chunk),
                    None => break,
                }
            } else {
                self.fill(Vec::with_capacity(self.max_links), depth - 1)
            };
            children.push(child);
        }
        internal_node(&children)
    }

    fn build(mut self) -> DagNode {
        let mut root = match self.chunks.next() {
            Some(chunk) => raw_leaf(chunk),
            None => return raw_leaf(&[]),
        };
        let mut depth = 1;
        while !self.done() {
            let mut children = Vec::with_capacity(self.max_links);
            children.push(root);
            root = self.fill(children, depth);
            depth += 1;
        }
        root
    }
}

fn file_node(data: &[u8], params: DagParams) -> DagNode {
    BalancedLayout::new(data, params).build()
}

fn validate_name(name: &str) -> CidResult<()> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.contains('/') {
        "name contains a path separator"
    } else if name == "." || name == ".." {
        "name is a relative path component"
    } else {
        return Ok(());
    };
    Err(CidError::InvalidName {
        name: name.to_string(),
        reason,
    })
}

pub(crate) fn single_file_dir_cid_with(
    data: &[u8],
    name: &str,
    params: DagParams,
) -> CidResult<ContentId> {
    validate_name(name)?;
    let file = file_node(data, params);
    let directory = encode_node(
        &[PbLink {
            hash: file.cid,
            name,
            tsize: file.tsize,
        }],
        &unixfs_directory_data(),
    );
    Ok(ContentId::hash(Codec::DagPb, &directory))
}

/// CID of `data` stored as the only entry, named `name`, of a new UnixFS
/// directory.
///
/// Matches an IPFS import with CIDv1, sha2-256, raw leaves, 1 MiB fixed-size
/// chunks and a balanced layout of up to 1024 links per node. No network
/// access is involved.
pub fn single_file_dir_cid(data: &[u8], name: &str) -> CidResult<ContentId> {
    single_file_dir_cid_with(data, name, DagParams::default())
}

/// CID of the file DAG root for `data` alone, without the wrapping directory.
pub fn file_cid(data: &[u8]) -> ContentId {
    file_node(data, DagParams::default()).cid
}

/// CID of `data` as a single raw block.
pub fn raw_leaf_cid(data: &[u8]) -> ContentId {
    ContentId::hash(Codec::Raw, data)
}
