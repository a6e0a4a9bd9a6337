mod normalize;
mod serialize;
mod whitespace;
