use crate::asset::{AssetError, Result};

/// Simple bounded cursor over an immutable byte slice.
///
/// The container format is little-endian throughout, so only
/// little-endian readers are provided.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	/// Return current byte offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(AssetError::UnexpectedEof {
				at: self.pos,
				need: n,
				rem: self.remaining(),
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Read a four-byte code.
	pub fn read_code4(&mut self) -> Result<[u8; 4]> {
		let raw = self.read_exact(4)?;
		let mut out = [0_u8; 4];
		out.copy_from_slice(raw);
		Ok(out)
	}

	/// Read one byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_exact(1)?[0])
	}

	/// Read a little-endian `u16`.
	pub fn read_u16_le(&mut self) -> Result<u16> {
		let raw = self.read_exact(2)?;
		let mut buf = [0_u8; 2];
		buf.copy_from_slice(raw);
		Ok(u16::from_le_bytes(buf))
	}

	/// Read a little-endian `u32`.
	pub fn read_u32_le(&mut self) -> Result<u32> {
		let raw = self.read_exact(4)?;
		let mut buf = [0_u8; 4];
		buf.copy_from_slice(raw);
		Ok(u32::from_le_bytes(buf))
	}

	/// Read a little-endian `i32`.
	pub fn read_i32_le(&mut self) -> Result<i32> {
		let raw = self.read_exact(4)?;
		let mut buf = [0_u8; 4];
		buf.copy_from_slice(raw);
		Ok(i32::from_le_bytes(buf))
	}

	/// Read a little-endian `u64`.
	pub fn read_u64_le(&mut self) -> Result<u64> {
		let raw = self.read_exact(8)?;
		let mut buf = [0_u8; 8];
		buf.copy_from_slice(raw);
		Ok(u64::from_le_bytes(buf))
	}

	/// Read a little-endian `i64`.
	pub fn read_i64_le(&mut self) -> Result<i64> {
		let raw = self.read_exact(8)?;
		let mut buf = [0_u8; 8];
		buf.copy_from_slice(raw);
		Ok(i64::from_le_bytes(buf))
	}

	/// Advance to the next 4-byte aligned position.
	pub fn align4(&mut self) -> Result<()> {
		let aligned = (self.pos + 3) & !3;
		let skip = aligned.saturating_sub(self.pos);
		let _ = self.read_exact(skip)?;
		Ok(())
	}

	/// Read a zero-terminated byte string without the terminator.
	pub fn read_cstring_bytes(&mut self) -> Result<&'a [u8]> {
		let start = self.pos;
		let rem = &self.bytes[self.pos..];
		let Some(rel_end) = rem.iter().position(|byte| *byte == 0) else {
			return Err(AssetError::UnexpectedEof {
				at: self.pos,
				need: 1,
				rem: self.remaining(),
			});
		};

		let end = start + rel_end;
		self.pos = end + 1;
		Ok(&self.bytes[start..end])
	}

	/// Read an `i32`-counted UTF-8 string followed by 4-byte alignment.
	pub fn read_count_string(&mut self) -> Result<String> {
		let at = self.pos;
		let len = self.read_i32_le()?;
		if len < 0 {
			return Err(AssetError::NegativeLength { at, len: i64::from(len) });
		}

		let raw = self.read_exact(len as usize)?;
		let text = String::from_utf8_lossy(raw).into_owned();
		self.align4()?;
		Ok(text)
	}
}

/// Growable little-endian byte sink mirroring [`Cursor`].
#[derive(Default)]
pub struct ByteWriter {
	out: Vec<u8>,
}

impl ByteWriter {
	/// Create an empty writer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Return bytes written so far.
	pub fn len(&self) -> usize {
		self.out.len()
	}

	/// Return whether nothing has been written.
	pub fn is_empty(&self) -> bool {
		self.out.is_empty()
	}

	/// Append raw bytes.
	pub fn put_bytes(&mut self, bytes: &[u8]) {
		self.out.extend_from_slice(bytes);
	}

	/// Append one byte.
	pub fn put_u8(&mut self, value: u8) {
		self.out.push(value);
	}

	/// Append a little-endian `u16`.
	pub fn put_u16(&mut self, value: u16) {
		self.out.extend_from_slice(&value.to_le_bytes());
	}

	/// Append a little-endian `u32`.
	pub fn put_u32(&mut self, value: u32) {
		self.out.extend_from_slice(&value.to_le_bytes());
	}

	/// Append a little-endian `i32`.
	pub fn put_i32(&mut self, value: i32) {
		self.out.extend_from_slice(&value.to_le_bytes());
	}

	/// Append a little-endian `u64`.
	pub fn put_u64(&mut self, value: u64) {
		self.out.extend_from_slice(&value.to_le_bytes());
	}

	/// Append a little-endian `i64`.
	pub fn put_i64(&mut self, value: i64) {
		self.out.extend_from_slice(&value.to_le_bytes());
	}

	/// Append a little-endian `f32`.
	pub fn put_f32(&mut self, value: f32) {
		self.out.extend_from_slice(&value.to_le_bytes());
	}

	/// Append a zero-terminated string.
	pub fn put_cstring(&mut self, text: &str) {
		self.out.extend_from_slice(text.as_bytes());
		self.out.push(0);
	}

	/// Append an `i32`-counted UTF-8 string followed by 4-byte alignment.
	pub fn put_count_string(&mut self, text: &str) {
		self.put_i32(text.len() as i32);
		self.out.extend_from_slice(text.as_bytes());
		self.align4();
	}

	/// Pad with zero bytes to the next 4-byte aligned position.
	pub fn align4(&mut self) {
		while self.out.len() % 4 != 0 {
			self.out.push(0);
		}
	}

	/// Consume the writer and return the accumulated bytes.
	pub fn into_bytes(self) -> Vec<u8> {
		self.out
	}
}
