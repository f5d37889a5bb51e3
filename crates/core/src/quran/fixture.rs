//! A 114-sura verse store for tests: the real verse counts, real text for
//! the suras the tests read and a one-word placeholder elsewhere.

use super::store::{QuranStore, Sura, Verse};

pub const VERSE_COUNTS: [usize; 114] = [
    7, 286, 200, 176, 120, 165, 206, 75, 129, 109, 123, 111, 43, 52, 99, 128, 111, 110, 98,
    135, 112, 78, 118, 64, 77, 227, 93, 88, 69, 60, 34, 30, 73, 54, 45, 83, 182, 88, 75, 85,
    54, 53, 89, 59, 37, 35, 38, 29, 18, 45, 60, 49, 62, 55, 78, 96, 29, 22, 24, 13, 14, 11,
    11, 18, 12, 12, 30, 52, 52, 44, 28, 28, 20, 56, 40, 31, 50, 40, 46, 42, 29, 19, 36, 25,
    22, 17, 19, 26, 30, 20, 15, 21, 11, 8, 8, 19, 5, 8, 8, 11, 11, 8, 3, 9, 5, 4, 7, 3, 6, 3,
    5, 4, 5, 6,
];

const PLACEHOLDER: (&str, &str) = ("كَلِمَةٌ", "كَلِمَةٌ");

pub const BISMILLAH: (&str, &str) = (
    "بِسْمِ ٱللَّهِ ٱلرَّحْمَـٰنِ ٱلرَّحِيمِ",
    "بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ",
);

const SURA_1: [(&str, &str); 7] = [
    (
        "بِسْمِ ٱللَّهِ ٱلرَّحْمَـٰنِ ٱلرَّحِيمِ",
        "بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ",
    ),
    (
        "ٱلْحَمْدُ لِلَّهِ رَبِّ ٱلْعَـٰلَمِينَ",
        "الْحَمْدُ لِلَّهِ رَبِّ الْعَالَمِينَ",
    ),
    (
        "ٱلرَّحْمَـٰنِ ٱلرَّحِيمِ",
        "الرَّحْمَٰنِ الرَّحِيمِ",
    ),
    (
        "مَـٰلِكِ يَوْمِ ٱلدِّينِ",
        "مَالِكِ يَوْمِ الدِّينِ",
    ),
    (
        "إِيَّاكَ نَعْبُدُ وَإِيَّاكَ نَسْتَعِينُ",
        "إِيَّاكَ نَعْبُدُ وَإِيَّاكَ نَسْتَعِينُ",
    ),
    (
        "ٱهْدِنَا ٱلصِّرَٰطَ ٱلْمُسْتَقِيمَ",
        "اهْدِنَا الصِّرَاطَ الْمُسْتَقِيمَ",
    ),
    (
        "صِرَٰطَ ٱلَّذِينَ أَنْعَمْتَ عَلَيْهِمْ غَيْرِ ٱلْمَغْضُوبِ عَلَيْهِمْ وَلَا ٱلضَّآلِّينَ",
        "صِرَاطَ الَّذِينَ أَنْعَمْتَ عَلَيْهِمْ غَيْرِ الْمَغْضُوبِ عَلَيْهِمْ وَلَا الضَّالِّينَ",
    ),
];

const SURA_112: [(&str, &str); 4] = [
    (
        "قُلْ هُوَ ٱللَّهُ أَحَدٌ",
        "قُلْ هُوَ اللَّهُ أَحَدٌ",
    ),
    (
        "ٱللَّهُ ٱلصَّمَدُ",
        "اللَّهُ الصَّمَدُ",
    ),
    (
        "لَمْ يَلِدْ وَلَمْ يُولَدْ",
        "لَمْ يَلِدْ وَلَمْ يُولَدْ",
    ),
    (
        "وَلَمْ يَكُن لَّهُۥ كُفُوًا أَحَدٌۢ",
        "وَلَمْ يَكُنْ لَهُ كُفُوًا أَحَدٌ",
    ),
];

const SURA_113: [(&str, &str); 5] = [
    (
        "قُلْ أَعُوذُ بِرَبِّ ٱلْفَلَقِ",
        "قُلْ أَعُوذُ بِرَبِّ الْفَلَقِ",
    ),
    (
        "مِن شَرِّ مَا خَلَقَ",
        "مِنْ شَرِّ مَا خَلَقَ",
    ),
    (
        "وَمِن شَرِّ غَاسِقٍ إِذَا وَقَبَ",
        "وَمِنْ شَرِّ غَاسِقٍ إِذَا وَقَبَ",
    ),
    (
        "وَمِن شَرِّ ٱلنَّفَّـٰثَـٰتِ فِى ٱلْعُقَدِ",
        "وَمِنْ شَرِّ النَّفَّاثَاتِ فِي الْعُقَدِ",
    ),
    (
        "وَمِن شَرِّ حَاسِدٍ إِذَا حَسَدَ",
        "وَمِنْ شَرِّ حَاسِدٍ إِذَا حَسَدَ",
    ),
];

const SURA_114: [(&str, &str); 6] = [
    (
        "قُلْ أَعُوذُ بِرَبِّ ٱلنَّاسِ",
        "قُلْ أَعُوذُ بِرَبِّ النَّاسِ",
    ),
    (
        "مَلِكِ ٱلنَّاسِ",
        "مَلِكِ النَّاسِ",
    ),
    (
        "إِلَـٰهِ ٱلنَّاسِ",
        "إِلَٰهِ النَّاسِ",
    ),
    (
        "مِن شَرِّ ٱلْوَسْوَاسِ ٱلْخَنَّاسِ",
        "مِنْ شَرِّ الْوَسْوَاسِ الْخَنَّاسِ",
    ),
    (
        "ٱلَّذِى يُوَسْوِسُ فِى صُدُورِ ٱلنَّاسِ",
        "الَّذِي يُوَسْوِسُ فِي صُدُورِ النَّاسِ",
    ),
    (
        "مِنَ ٱلْجِنَّةِ وَٱلنَّاسِ",
        "مِنَ الْجِنَّةِ وَالنَّاسِ",
    ),
];

fn real_text(sura: usize, aya: usize) -> Option<(&'static str, &'static str)> {
    match (sura, aya) {
        (1, a) => SURA_1.get(a - 1).copied(),
        (112, a) => SURA_112.get(a - 1).copied(),
        (113, a) => SURA_113.get(a - 1).copied(),
        (114, a) => SURA_114.get(a - 1).copied(),
        (2, 21) => Some((
            "يَـٰٓأَيُّهَا ٱلنَّاسُ ٱعْبُدُوا۟ رَبَّكُمُ ٱلَّذِى خَلَقَكُمْ وَٱلَّذِينَ مِن قَبْلِكُمْ لَعَلَّكُمْ تَتَّقُونَ",
            "يَا أَيُّهَا النَّاسُ اعْبُدُوا رَبَّكُمُ الَّذِي خَلَقَكُمْ وَالَّذِينَ مِنْ قَبْلِكُمْ لَعَلَّكُمْ تَتَّقُونَ",
        )),
        (72, 16) => Some((
            "وَأَلَّوِ ٱسْتَقَـٰمُوا۟ عَلَى ٱلطَّرِيقَةِ لَأَسْقَيْنَـٰهُم مَّآءً غَدَقًۭا",
            "وَأَنْ لَوِ اسْتَقَامُوا عَلَى الطَّرِيقَةِ لَأَسْقَيْنَاهُمْ مَاءً غَدَقًا",
        )),
        _ => None,
    }
}

fn sura_name(sura: usize) -> String {
    match sura {
        1 => "الفاتحة".into(),
        72 => "الجن".into(),
        112 => "الإخلاص".into(),
        113 => "الفلق".into(),
        114 => "الناس".into(),
        n => format!("سورة {n}"),
    }
}

pub fn store() -> QuranStore {
    let suras = VERSE_COUNTS
        .iter()
        .enumerate()
        .map(|(idx, &count)| {
            let sura = idx + 1;
            let verses = (1..=count)
                .map(|aya| {
                    let (uthmani, imlaey) = real_text(sura, aya).unwrap_or(PLACEHOLDER);
                    let verse = Verse::new(uthmani, imlaey);
                    if aya == 1 && sura != 1 && sura != 9 {
                        verse.with_bismillah(BISMILLAH.0, BISMILLAH.1)
                    } else {
                        verse
                    }
                })
                .collect();
            Sura {
                name: sura_name(sura),
                verses,
            }
        })
        .collect();
    QuranStore::from_suras(suras).unwrap()
}
