//! Little-endian primitives used on the serial link.
//!
//! An order travels as a single signed byte. Arguments that follow an order
//! (frame period, exposure time) are `i16`.

use crate::types::{Order, UnknownOrder};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

pub fn read_i8<R: Read + ?Sized>(r: &mut R) -> io::Result<i8> {
    r.read_i8()
}

pub fn read_i16<R: Read + ?Sized>(r: &mut R) -> io::Result<i16> {
    r.read_i16::<LittleEndian>()
}

pub fn read_i32<R: Read + ?Sized>(r: &mut R) -> io::Result<i32> {
    r.read_i32::<LittleEndian>()
}

pub fn write_i8<W: Write + ?Sized>(w: &mut W, value: i8) -> io::Result<()> {
    w.write_i8(value)
}

pub fn write_i16<W: Write + ?Sized>(w: &mut W, value: i16) -> io::Result<()> {
    w.write_i16::<LittleEndian>(value)
}

pub fn write_i32<W: Write + ?Sized>(w: &mut W, value: i32) -> io::Result<()> {
    w.write_i32::<LittleEndian>(value)
}

pub fn write_order<W: Write + ?Sized>(w: &mut W, order: Order) -> io::Result<()> {
    w.write_u8(order.code())
}

/// Reads one byte and maps it to an order. An unmapped byte comes back as
/// `InvalidData` wrapping [`UnknownOrder`].
pub fn read_order<R: Read + ?Sized>(r: &mut R) -> io::Result<Order> {
    let byte = r.read_u8()?;
    Order::try_from(byte).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Recovers the offending byte from an error produced by [`read_order`].
pub fn unknown_order(err: &io::Error) -> Option<UnknownOrder> {
    err.get_ref()
        .and_then(|inner| inner.downcast_ref::<UnknownOrder>())
        .copied()
}
