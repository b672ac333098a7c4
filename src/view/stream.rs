//! The component-stream wire encoding.
//!
//! A tree is flattened into newline-delimited JSON frames: a version
//! row followed by one row per node in breadth-first order, each row
//! referencing its children by id with the root at id 0. The encoding
//! is self-describing and decodable because document assembly consumes
//! it: document output is always built from a rendered stream.

use std::collections::{BTreeMap, VecDeque};

use axum::body::Bytes;
use serde::{Deserialize, Serialize};

use super::node::{Element, Node};

#[derive(thiserror::Error, Debug)]
pub enum StreamError {
    #[error("failed to encode stream frame: {0}")]
    Encode(serde_json::Error),

    #[error("malformed stream frame: {0}")]
    Frame(serde_json::Error),

    #[error("empty stream")]
    Empty,

    #[error("unsupported stream version {0}")]
    Version(u32),

    #[error("stream references missing row {0}")]
    MissingRow(u32),
}

#[derive(Serialize, Deserialize)]
struct Meta {
    v: u32,
}

const STREAM_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Row {
    id: u32,
    #[serde(flatten)]
    body: RowBody,
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum RowBody {
    Element {
        tag: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        attrs: Vec<(String, String)>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<u32>,
    },
    Text {
        text: String,
    },
    Raw {
        html: String,
    },
    Fragment {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<u32>,
    },
}

fn frame<T: Serialize>(value: &T) -> Result<Bytes, StreamError> {
    let mut buf = serde_json::to_vec(value).map_err(StreamError::Encode)?;
    buf.push(b'\n');
    Ok(Bytes::from(buf))
}

/// Encode a tree into wire frames.
pub fn encode(node: &Node) -> Result<Vec<Bytes>, StreamError> {
    let mut frames = vec![frame(&Meta { v: STREAM_VERSION })?];

    let mut queue: VecDeque<(&Node, u32)> = VecDeque::new();
    queue.push_back((node, 0));
    let mut next_id = 1u32;

    while let Some((node, id)) = queue.pop_front() {
        let body = match node {
            Node::Text(content) => RowBody::Text {
                text: content.clone(),
            },
            Node::Raw(markup) => RowBody::Raw {
                html: markup.clone(),
            },
            Node::Fragment(children) => RowBody::Fragment {
                children: enqueue(children, &mut queue, &mut next_id),
            },
            Node::Element(Element {
                tag,
                attrs,
                children,
            }) => RowBody::Element {
                tag: tag.clone(),
                attrs: attrs.clone(),
                children: enqueue(children, &mut queue, &mut next_id),
            },
        };
        frames.push(frame(&Row { id, body })?);
    }

    Ok(frames)
}

/// Assign ids to a row's children and queue them for emission.
fn enqueue<'a>(
    children: &'a [Node],
    queue: &mut VecDeque<(&'a Node, u32)>,
    next_id: &mut u32,
) -> Vec<u32> {
    let mut ids = Vec::with_capacity(children.len());
    for child in children {
        ids.push(*next_id);
        queue.push_back((child, *next_id));
        *next_id += 1;
    }
    ids
}

/// Decode wire frames back into a tree.
pub fn decode(frames: &[Bytes]) -> Result<Node, StreamError> {
    let mut iter = frames.iter();
    let meta_frame = iter.next().ok_or(StreamError::Empty)?;
    let meta: Meta = serde_json::from_slice(meta_frame).map_err(StreamError::Frame)?;
    if meta.v != STREAM_VERSION {
        return Err(StreamError::Version(meta.v));
    }

    let mut rows: BTreeMap<u32, RowBody> = BTreeMap::new();
    for frame in iter {
        let row: Row = serde_json::from_slice(frame).map_err(StreamError::Frame)?;
        rows.insert(row.id, row.body);
    }

    rebuild(&rows, 0)
}

fn rebuild(rows: &BTreeMap<u32, RowBody>, id: u32) -> Result<Node, StreamError> {
    let row = rows.get(&id).ok_or(StreamError::MissingRow(id))?;
    let node = match row {
        RowBody::Text { text } => Node::Text(text.clone()),
        RowBody::Raw { html } => Node::Raw(html.clone()),
        RowBody::Fragment { children } => Node::Fragment(
            children
                .iter()
                .map(|child| rebuild(rows, *child))
                .collect::<Result<_, _>>()?,
        ),
        RowBody::Element {
            tag,
            attrs,
            children,
        } => Node::Element(Element {
            tag: tag.clone(),
            attrs: attrs.clone(),
            children: children
                .iter()
                .map(|child| rebuild(rows, *child))
                .collect::<Result<_, _>>()?,
        }),
    };
    Ok(node)
}
