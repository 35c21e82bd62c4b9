use gmsuite::sm2::agreement::{calculate_shared_key, AgreementInput};
use gmsuite::sm2::{generate_keypair, z::compute_z};

#[test]
fn both_parties_derive_an_identical_key_regardless_of_role() {
    let _ = env_logger::try_init();
    let a_static = generate_keypair().unwrap();
    let a_eph = generate_keypair().unwrap();
    let b_static = generate_keypair().unwrap();
    let b_eph = generate_keypair().unwrap();

    let za = compute_z(Some(b"1234567812345678"), &a_static.public_key).unwrap();
    let zb = compute_z(Some(b"1234567812345678"), &b_static.public_key).unwrap();

    let a_side = AgreementInput {
        static_private: &a_static.private_key,
        static_public: &a_static.public_key,
        ephemeral_private: &a_eph.private_key,
        ephemeral_public: &a_eph.public_key,
    };
    let b_side = AgreementInput {
        static_private: &b_static.private_key,
        static_public: &b_static.public_key,
        ephemeral_private: &b_eph.private_key,
        ephemeral_public: &b_eph.public_key,
    };
    let b_as_seen_by_a = AgreementInput {
        static_private: &b_static.private_key,
        static_public: &b_static.public_key,
        ephemeral_private: &b_eph.private_key,
        ephemeral_public: &b_eph.public_key,
    };
    let a_as_seen_by_b = AgreementInput {
        static_private: &a_static.private_key,
        static_public: &a_static.public_key,
        ephemeral_private: &a_eph.private_key,
        ephemeral_public: &a_eph.public_key,
    };

    let k_a = calculate_shared_key(&a_side, &b_as_seen_by_a, &za, &zb, 16, false).unwrap();
    let k_b = calculate_shared_key(&b_side, &a_as_seen_by_b, &zb, &za, 16, true).unwrap();

    assert_eq!(k_a, k_b);
    assert_eq!(k_a.len(), 16);
}

#[test]
fn different_identifiers_change_the_derived_key() {
    let a_static = generate_keypair().unwrap();
    let a_eph = generate_keypair().unwrap();
    let b_static = generate_keypair().unwrap();
    let b_eph = generate_keypair().unwrap();

    let a_side = AgreementInput {
        static_private: &a_static.private_key,
        static_public: &a_static.public_key,
        ephemeral_private: &a_eph.private_key,
        ephemeral_public: &a_eph.public_key,
    };
    let b_as_seen_by_a = AgreementInput {
        static_private: &b_static.private_key,
        static_public: &b_static.public_key,
        ephemeral_private: &b_eph.private_key,
        ephemeral_public: &b_eph.public_key,
    };

    let za = compute_z(Some(b"alice-identifier"), &a_static.public_key).unwrap();
    let zb = compute_z(Some(b"bob-identifier"), &b_static.public_key).unwrap();
    let zb_other = compute_z(Some(b"mallory-identifier"), &b_static.public_key).unwrap();

    let k_honest = calculate_shared_key(&a_side, &b_as_seen_by_a, &za, &zb, 16, false).unwrap();
    let k_tampered_id = calculate_shared_key(&a_side, &b_as_seen_by_a, &za, &zb_other, 16, false).unwrap();
    assert_ne!(k_honest, k_tampered_id);
}
