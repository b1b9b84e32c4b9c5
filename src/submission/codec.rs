use bytes::{Bytes, BytesMut};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io;
use std::marker::PhantomData;
use tokio_util::codec::{Decoder, Encoder, LengthDelimitedCodec};

use crate::submission::protocol::{ClientMessage, RuntimeMessage};

/// Length-delimited framing (TCP) with bincode payloads.
///
/// `Out` is what this side writes, `In` what it reads.
pub struct ControlCodec<Out, In> {
    codec: LengthDelimitedCodec,
    _marker: PhantomData<fn(Out) -> In>,
}

/// Codec used by the submitting client.
pub type ClientCodec = ControlCodec<ClientMessage, RuntimeMessage>;

/// Codec used by the job manager side, e.g. in tests.
pub type RuntimeCodec = ControlCodec<RuntimeMessage, ClientMessage>;

impl<Out, In> ControlCodec<Out, In> {
    pub fn new() -> Self {
        Self { codec: LengthDelimitedCodec::new(), _marker: PhantomData }
    }
}

impl<Out, In> Default for ControlCodec<Out, In> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Out: Serialize, In> Encoder<Out> for ControlCodec<Out, In> {
    type Error = io::Error;

    fn encode(&mut self, item: Out, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let bytes = bincode::serialize(&item).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        self.codec.encode(Bytes::from(bytes), dst)
    }
}

impl<Out, In: DeserializeOwned> Decoder for ControlCodec<Out, In> {
    type Item = In;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.codec.decode(src)? {
            Some(bytes) => {
                let item = bincode::deserialize(&bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }
}
