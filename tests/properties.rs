use proptest::prelude::*;

use qst_decode::cipher::{self, Checksum, QuestCipher};
use qst_decode::container::{ContainerDecoder, PACK_MAGIC, PackfileDecoder};
use qst_decode::container::{id_mask, xor_password};
use qst_decode::decode::{DecodeOptions, decode_layer, encode_quest};
use qst_decode::frame::QUEST_PREAMBLE;
use qst_decode::method::{METHOD_COUNT, METHODS};
use qst_decode::password::container_password;
use qst_decode::rng::QuestRng;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn cipher_roundtrip(
        data in proptest::collection::vec(any::<u8>(), 0..512),
        seed in any::<u32>(),
        m in 0..METHOD_COUNT,
    ) {
        let method = &METHODS[m];
        let (ciphertext, trailer) = cipher::encrypt(&data, seed, method);
        let mut c = QuestCipher::new(seed, method);
        let mut plain = ciphertext;
        c.decrypt(&mut plain);
        prop_assert_eq!(&plain, &data);
        prop_assert_eq!(c.checksum(), Checksum::of(&data));
        prop_assert!(c.verify(trailer));
    }

    #[test]
    fn generator_is_deterministic(seed in any::<u32>(), m in 0..METHOD_COUNT) {
        let mut a = QuestRng::new(seed);
        let mut b = QuestRng::new(seed);
        for _ in 0..32 {
            prop_assert_eq!(a.next(&METHODS[m]), b.next(&METHODS[m]));
        }
        prop_assert_eq!(a, b);
    }

    #[test]
    fn swap_keeps_sum(data in proptest::collection::vec(any::<u8>(), 2..64), i in 0usize..64, j in 0usize..64) {
        let i = i % data.len();
        let j = j % data.len();
        let mut swapped = data.clone();
        swapped.swap(i, j);
        prop_assert_eq!(Checksum::of(&data).a, Checksum::of(&swapped).a);
    }

    #[test]
    fn layer_roundtrip_any_method(
        data in proptest::collection::vec(any::<u8>(), 0..256),
        raw_seed in any::<u32>(),
        m in 0..METHOD_COUNT,
    ) {
        let frame = encode_quest(&data, raw_seed, &METHODS[m], QUEST_PREAMBLE);
        let layer = decode_layer(&frame, &DecodeOptions::default()).unwrap();
        prop_assert_eq!(layer.method.index, m);
        prop_assert_eq!(layer.plaintext, data);
    }

    #[test]
    fn packfile_literals_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..300)) {
        let pw = container_password();
        let mut container = (PACK_MAGIC ^ id_mask(pw)).to_be_bytes().to_vec();
        for chunk in data.chunks(8) {
            container.push(0xFF);
            container.extend_from_slice(chunk);
        }
        xor_password(&mut container, pw);
        prop_assert_eq!(PackfileDecoder.decode(&container, pw).unwrap(), data);
    }

    #[test]
    fn decode_is_panic_free_on_random_bytes(data in proptest::collection::vec(any::<u8>(), 0..128)) {
        let mut framed = QUEST_PREAMBLE.to_vec();
        framed.extend_from_slice(&data);
        let _ = decode_layer(&framed, &DecodeOptions::default());
        let _ = PackfileDecoder.decode(&data, container_password());
    }
}

#[test]
fn swap_changes_rotating_checksum() {
    let data = [0x01u8, 0x02, 0x03, 0x04];
    let swapped = [0x02u8, 0x01, 0x03, 0x04];
    let x = Checksum::of(&data);
    let y = Checksum::of(&swapped);
    assert_eq!(x.a, y.a);
    assert_ne!(x.b, y.b);
}
