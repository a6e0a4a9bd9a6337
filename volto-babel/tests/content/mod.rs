mod fields;
mod roundtrip;
