use crate::poly_commit::pcs::ToBytes;
use crate::utils::scalar_to_bytes;
use ark_ff::PrimeField;
use ark_std::rand::{RngCore, SeedableRng};
use merlin::Transcript;
use rand_chacha::ChaChaRng;

/// The trait for polynomial commitment transcript.
pub trait PolyComTranscript {
    /// Append the commitment to the transcript.
    fn append_commitment<C: ToBytes>(&mut self, commitment: &C);

    /// Append the field element to the transcript.
    fn append_field_elem<F: PrimeField>(&mut self, elem: &F);

    /// Append a 32-byte digest to the transcript.
    fn append_digest(&mut self, digest: &[u8; 32]);

    /// Get a field element challenge.
    fn get_challenge_field_elem<F: PrimeField>(&mut self, label: &'static [u8]) -> F;

    /// Get a uniform index challenge below `bound`; `bound` must be a power
    /// of two so masking stays unbiased.
    fn get_challenge_index(&mut self, label: &'static [u8], bound: usize) -> usize;

    /// Get raw challenge bytes.
    fn get_challenge_bytes(&mut self, label: &'static [u8]) -> [u8; 32];
}

impl PolyComTranscript for Transcript {
    fn append_commitment<C: ToBytes>(&mut self, commitment: &C) {
        self.append_message(b"append commitment", &commitment.to_bytes());
    }

    fn append_field_elem<F: PrimeField>(&mut self, elem: &F) {
        self.append_message(b"append field element", &scalar_to_bytes(elem));
    }

    fn append_digest(&mut self, digest: &[u8; 32]) {
        self.append_message(b"append digest", digest);
    }

    fn get_challenge_field_elem<F: PrimeField>(&mut self, label: &'static [u8]) -> F {
        let mut buff = [0u8; 32];
        self.challenge_bytes(label, &mut buff);
        F::rand(&mut ChaChaRng::from_seed(buff))
    }

    fn get_challenge_index(&mut self, label: &'static [u8], bound: usize) -> usize {
        debug_assert!(bound.is_power_of_two());
        let mut buff = [0u8; 32];
        self.challenge_bytes(label, &mut buff);
        let mut prng = ChaChaRng::from_seed(buff);
        (prng.next_u64() as usize) & (bound - 1)
    }

    fn get_challenge_bytes(&mut self, label: &'static [u8]) -> [u8; 32] {
        let mut buff = [0u8; 32];
        self.challenge_bytes(label, &mut buff);
        buff
    }
}

#[cfg(test)]
mod test {
    use super::PolyComTranscript;
    use ark_bls12_381::Fr;
    use merlin::Transcript;

    #[test]
    fn identical_transcripts_give_identical_challenges() {
        let mut t1 = Transcript::new(b"test");
        let mut t2 = Transcript::new(b"test");
        t1.append_field_elem(&Fr::from(17u64));
        t2.append_field_elem(&Fr::from(17u64));
        let c1: Fr = t1.get_challenge_field_elem(b"alpha");
        let c2: Fr = t2.get_challenge_field_elem(b"alpha");
        assert_eq!(c1, c2);
        // a second squeeze with the same label advances the state
        let c3: Fr = t1.get_challenge_field_elem(b"alpha");
        assert_ne!(c1, c3);
    }

    #[test]
    fn diverging_transcripts_diverge() {
        let mut t1 = Transcript::new(b"test");
        let mut t2 = Transcript::new(b"test");
        t1.append_field_elem(&Fr::from(1u64));
        t2.append_field_elem(&Fr::from(2u64));
        let c1: Fr = t1.get_challenge_field_elem(b"alpha");
        let c2: Fr = t2.get_challenge_field_elem(b"alpha");
        assert_ne!(c1, c2);
    }

    #[test]
    fn index_challenge_in_bound() {
        let mut t = Transcript::new(b"test");
        for _ in 0..16 {
            let idx = t.get_challenge_index(b"query", 64);
            assert!(idx < 64);
        }
    }
}
