//! CBOR encoding of typed forms and raw values.
//!
//! Decoding a `Form` re-runs every constructor check through the serde
//! `try_from` hooks on each form, so a decoded value is as trustworthy as a
//! freshly built one. Rejected invariants surface as `Codec` carrying the
//! validation message. `Form::from_raw_cbor` instead decodes an untyped `Raw`
//! and classifies it, reporting shape problems as `MalformedInput`.

use crate::error::Result;
use crate::forms::Form;
use crate::raw::Raw;
use tracing::debug;

impl Form {
    /// Encodes this form, tag included.
    pub fn to_cbor(&self) -> Result<Vec<u8>> {
        let bytes = serde_cbor::to_vec(self)?;
        debug!(form = %self.kind(), bytes = bytes.len(), "encoded form");
        Ok(bytes)
    }

    /// Decodes a form written by [`Form::to_cbor`].
    ///
    /// # Errors
    /// `Codec` when the bytes are not a tagged form or a payload breaks its
    /// form's invariants.
    pub fn from_cbor(bytes: &[u8]) -> Result<Self> {
        let form: Form = serde_cbor::from_slice(bytes).map_err(|err| {
            debug!(bytes = bytes.len(), error = %err, "form decode failed");
            err
        })?;
        debug!(form = %form.kind(), "decoded form");
        Ok(form)
    }

    /// Decodes an untyped value and classifies it.
    ///
    /// # Errors
    /// `Codec` for undecodable bytes, `MalformedInput` when the value is not
    /// a well-shaped graph.
    pub fn from_raw_cbor(bytes: &[u8]) -> Result<Self> {
        Form::from_raw(&Raw::from_cbor(bytes)?)
    }
}

impl Raw {
    pub fn to_cbor(&self) -> Result<Vec<u8>> {
        Ok(serde_cbor::to_vec(self)?)
    }

    pub fn from_cbor(bytes: &[u8]) -> Result<Self> {
        Ok(serde_cbor::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use crate::forms::{Adjacency, Edges, FormKind, Matrix, Parallel, Serial};
    use crate::node::Node;

    fn sample() -> Adjacency {
        Adjacency::from_pairs([("a", vec!["b"]), ("b", vec!["c"]), ("d", vec![])]).unwrap()
    }

    #[test]
    fn every_form_survives_encoding() {
        let pivot = Form::Adjacency(sample());
        for kind in FormKind::ALL {
            let Ok(form) = pivot.convert(kind) else {
                assert_eq!(kind, FormKind::Serial);
                continue;
            };
            let bytes = form.to_cbor().unwrap();
            assert_eq!(Form::from_cbor(&bytes).unwrap(), form, "{kind}");
        }
    }

    #[test]
    fn isolated_nodes_survive_in_edge_lists() {
        let edges = match Form::Adjacency(sample()).convert(FormKind::Edges).unwrap() {
            Form::Edges(edges) => edges,
            other => panic!("expected edges, got {:?}", other.kind()),
        };
        assert_eq!(edges.loose(), &[Node::new("d")]);
        let decoded = Form::from_cbor(&Form::Edges(edges.clone()).to_cbor().unwrap()).unwrap();
        assert_eq!(decoded, Form::Edges(edges));
    }

    #[test]
    fn decoding_revalidates_serials() {
        let repeated = serde_cbor::to_vec(&serde_cbor::Value::Map(
            [
                (
                    serde_cbor::Value::Text("form".into()),
                    serde_cbor::Value::Text("serial".into()),
                ),
                (
                    serde_cbor::Value::Text("data".into()),
                    serde_cbor::Value::Array(vec![
                        serde_cbor::Value::Text("a".into()),
                        serde_cbor::Value::Text("b".into()),
                        serde_cbor::Value::Text("a".into()),
                    ]),
                ),
            ]
            .into_iter()
            .collect(),
        ))
        .unwrap();
        let err = Form::from_cbor(&repeated).unwrap_err();
        assert!(matches!(err, GraphError::Codec(ref reason) if reason.contains("serial")));
    }

    #[test]
    fn decoding_revalidates_matrices() {
        let bytes = Form::Matrix(
            Matrix::from_bits(&[vec![0, 1], vec![0, 0]], vec![Node::new("a"), Node::new("b")])
                .unwrap(),
        )
        .to_cbor()
        .unwrap();
        assert!(Form::from_cbor(&bytes).is_ok());
        assert!(matches!(Form::from_cbor(&bytes[..bytes.len() - 1]), Err(GraphError::Codec(_))));
    }

    #[test]
    fn raw_values_classify_after_decoding() {
        let raw = Raw::List(vec![Raw::pair("a", "b"), Raw::pair("b", "c")]);
        let form = Form::from_raw_cbor(&raw.to_cbor().unwrap()).unwrap();
        assert_eq!(form, Form::Edges(Edges::from_pairs([("a", "b"), ("b", "c")]).unwrap()));

        let set = Raw::Set(vec![Raw::text("a")]);
        assert!(matches!(
            Form::from_raw_cbor(&set.to_cbor().unwrap()),
            Err(GraphError::MalformedInput { expected: None, .. })
        ));
    }

    #[test]
    fn paths_keep_their_order() {
        let parallel = Parallel::new(vec![
            Serial::new(["x", "y"]).unwrap(),
            Serial::new(["a", "b"]).unwrap(),
        ]);
        let decoded = Form::from_cbor(&Form::Parallel(parallel.clone()).to_cbor().unwrap()).unwrap();
        assert_eq!(decoded, Form::Parallel(parallel));
    }
}
