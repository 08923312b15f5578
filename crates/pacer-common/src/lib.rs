pub mod codec;
pub mod display;
pub mod metrics;
pub mod net;
pub mod packet;
pub mod payload;
pub mod time;
pub mod types;

pub use codec::{decode, decode_ack, decode_data, encode, encode_ack, encode_data, CodecError, MAX_PAYLOAD};
pub use packet::{Packet, PacketType};
pub use types::{MsTime, PacketId};
