use crate::poly_commit::pcs::ToBytes;
use crate::poly_commit::transcript::PolyComTranscript;
use crate::utils::scalar_to_bytes;
use ark_ff::PrimeField;
use ark_std::rand::SeedableRng;
use merlin::Transcript;
use rand_chacha::ChaChaRng;

/// Initialize the transcript of one proof: domain separation, circuit
/// shape, the fixed-batch commitment and the per-instance public inputs.
pub(crate) fn transcript_init_plonk<C: ToBytes, F: PrimeField>(
    transcript: &mut Transcript,
    cs_size: u64,
    fixed_commitment: &C,
    k: &[F],
    root: &F,
    public_inputs: &[Vec<F>],
) {
    transcript.append_message(b"New Domain", b"Placeholder");
    transcript.append_u64(b"CS size", cs_size);
    transcript.append_message(
        b"field size",
        &scalar_to_bytes(&-F::one()),
    );
    transcript.append_commitment(fixed_commitment);
    transcript.append_field_elem(root);
    for generator in k.iter() {
        transcript.append_field_elem(generator);
    }
    for column in public_inputs.iter() {
        for value in column.iter() {
            transcript.append_field_elem(value);
        }
    }
}

/// Return the challenge result, rejecting `group_order`-th roots of unity
/// so evaluation points never land on the domain.
pub(crate) fn transcript_get_challenge_field_elem<F: PrimeField>(
    transcript: &mut Transcript,
    group_order: usize,
    label: &'static [u8],
) -> F {
    let mut buff = [0u8; 32];
    transcript.challenge_bytes(label, &mut buff);
    let mut prng = ChaChaRng::from_seed(buff);
    loop {
        let elem = F::rand(&mut prng);
        if elem.pow([group_order as u64]) != F::one() {
            return elem;
        }
    }
}

/// Return the challenge result by label: "theta".
pub(crate) fn transcript_get_plonk_challenge_theta<F: PrimeField>(
    transcript: &mut Transcript,
    group_order: usize,
) -> F {
    transcript_get_challenge_field_elem(transcript, group_order, b"theta")
}

/// Return the challenge result by label: "beta".
pub(crate) fn transcript_get_plonk_challenge_beta<F: PrimeField>(
    transcript: &mut Transcript,
    group_order: usize,
) -> F {
    transcript_get_challenge_field_elem(transcript, group_order, b"beta")
}

/// Return the challenge result by label: "gamma".
pub(crate) fn transcript_get_plonk_challenge_gamma<F: PrimeField>(
    transcript: &mut Transcript,
    group_order: usize,
) -> F {
    transcript_get_challenge_field_elem(transcript, group_order, b"gamma")
}

/// Return the challenge result by label: "delta".
pub(crate) fn transcript_get_plonk_challenge_delta<F: PrimeField>(
    transcript: &mut Transcript,
    group_order: usize,
) -> F {
    transcript_get_challenge_field_elem(transcript, group_order, b"delta")
}

/// Return the challenge result by label: "alpha".
pub(crate) fn transcript_get_plonk_challenge_alpha<F: PrimeField>(
    transcript: &mut Transcript,
    group_order: usize,
) -> F {
    transcript_get_challenge_field_elem(transcript, group_order, b"alpha")
}

/// Return the challenge result by label: "zeta".
pub(crate) fn transcript_get_plonk_challenge_zeta<F: PrimeField>(
    transcript: &mut Transcript,
    group_order: usize,
) -> F {
    transcript_get_challenge_field_elem(transcript, group_order, b"zeta")
}
