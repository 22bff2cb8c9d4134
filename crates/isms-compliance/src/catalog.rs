//! ISO/IEC 27001:2022 Annex-A catalog

use isms_common::{Category, ControlCode, IsmsError, IsmsResult, NewControl};

/// Code, title and requirement text of every Annex-A control
pub const ANNEX_A: [(&str, &str, &str); 93] = [
    (
        "5.1",
        "Politiques de sécurité",
        "Une politique de sécurité de l'information doit être définie, approuvée, publiée et communiquée.",
    ),
    (
        "5.2",
        "Fonctions et responsabilités",
        "Les fonctions et responsabilités liées à la sécurité doivent être définies.",
    ),
    ("5.3", "Séparation des tâches", "Les tâches incompatibles doivent être séparées."),
    (
        "5.4",
        "Responsabilités de la direction",
        "La direction doit exiger l'application des mesures de sécurité.",
    ),
    (
        "5.5",
        "Contacts avec les autorités",
        "Établir et maintenir le contact avec les autorités appropriées.",
    ),
    (
        "5.6",
        "Contacts avec groupes d'intérêt",
        "Maintenir des contacts avec des groupes d'intérêt spécifiques.",
    ),
    (
        "5.7",
        "Renseignement sur les menaces",
        "Collecter et analyser les informations sur les menaces.",
    ),
    ("5.8", "Sécurité dans la gestion de projet", "Intégrer la sécurité à la gestion de projet."),
    ("5.9", "Inventaire des actifs", "Élaborer et tenir à jour un inventaire des actifs."),
    (
        "5.10",
        "Utilisation correcte des actifs",
        "Identifier et documenter les règles d'utilisation des actifs.",
    ),
    (
        "5.11",
        "Restitution des actifs",
        "Le personnel doit restituer tous les actifs lors du départ.",
    ),
    (
        "5.12",
        "Classification des informations",
        "Classifier les informations selon les besoins de sécurité.",
    ),
    ("5.13", "Marquage des informations", "Élaborer des procédures de marquage des informations."),
    (
        "5.14",
        "Transfert des informations",
        "Mettre en place des règles de transfert d'informations.",
    ),
    ("5.15", "Contrôle d'accès", "Définir et mettre en œuvre des règles de contrôle d'accès."),
    ("5.16", "Gestion des identités", "Gérer le cycle de vie complet des identités."),
    (
        "5.17",
        "Informations d'authentification",
        "Contrôler l'attribution et la gestion des informations d'authentification.",
    ),
    ("5.18", "Droits d'accès", "Gérer les droits d'accès selon la politique de contrôle d'accès."),
    ("5.19", "Sécurité avec les fournisseurs", "Gérer les risques associés aux fournisseurs."),
    (
        "5.20",
        "Accords avec les fournisseurs",
        "Établir des exigences de sécurité avec chaque fournisseur.",
    ),
    (
        "5.21",
        "Chaîne d'approvisionnement TIC",
        "Gérer les risques de la chaîne d'approvisionnement TIC.",
    ),
    (
        "5.22",
        "Surveillance des services fournisseurs",
        "Surveiller et gérer les pratiques de sécurité des fournisseurs.",
    ),
    ("5.23", "Services en nuage", "Établir des processus pour les services en nuage."),
    (
        "5.24",
        "Planification gestion des incidents",
        "Planifier et préparer la gestion des incidents.",
    ),
    ("5.25", "Évaluation des événements", "Évaluer les événements de sécurité."),
    ("5.26", "Réponse aux incidents", "Répondre aux incidents selon les procédures."),
    (
        "5.27",
        "Tirer des enseignements",
        "Utiliser les connaissances des incidents pour améliorer la sécurité.",
    ),
    ("5.28", "Collecte de preuves", "Établir des procédures de collecte de preuves."),
    ("5.29", "Sécurité pendant perturbation", "Maintenir la sécurité pendant une perturbation."),
    (
        "5.30",
        "Préparation TIC pour continuité",
        "Planifier la préparation des TIC pour la continuité.",
    ),
    ("5.31", "Exigences légales", "Identifier et respecter les exigences légales."),
    (
        "5.32",
        "Droits de propriété intellectuelle",
        "Protéger les droits de propriété intellectuelle.",
    ),
    (
        "5.33",
        "Protection des enregistrements",
        "Protéger les enregistrements de la perte et falsification.",
    ),
    ("5.34", "Protection vie privée et DCP", "Respecter les exigences relatives à la vie privée."),
    ("5.35", "Révision indépendante", "Réviser l'approche de sécurité de manière indépendante."),
    ("5.36", "Conformité aux politiques", "Vérifier la conformité aux politiques de sécurité."),
    ("5.37", "Procédures d'exploitation documentées", "Documenter les procédures d'exploitation."),
    ("6.1", "Sélection des candidats", "Vérifier les références des candidats à l'embauche."),
    (
        "6.2",
        "Termes du contrat de travail",
        "Indiquer les responsabilités de sécurité dans les contrats.",
    ),
    ("6.3", "Sensibilisation et formation", "Former le personnel à la sécurité de l'information."),
    ("6.4", "Processus disciplinaire", "Formaliser un processus disciplinaire pour violations."),
    ("6.5", "Responsabilités après départ", "Définir les responsabilités après la fin d'emploi."),
    ("6.6", "Accords de confidentialité", "Établir des accords de confidentialité."),
    ("6.7", "Travail à distance", "Mettre en œuvre des mesures pour le travail à distance."),
    ("6.8", "Déclaration des événements", "Fournir un mécanisme de déclaration des incidents."),
    ("7.1", "Périmètres de sécurité physique", "Définir des périmètres de sécurité physique."),
    ("7.2", "Entrées physiques", "Protéger les zones sécurisées par des contrôles d'accès."),
    (
        "7.3",
        "Sécurisation des bureaux",
        "Concevoir des mesures de sécurité physique pour les bureaux.",
    ),
    ("7.4", "Surveillance sécurité physique", "Surveiller continuellement les locaux."),
    (
        "7.5",
        "Protection contre menaces physiques",
        "Protéger contre les menaces physiques et environnementales.",
    ),
    (
        "7.6",
        "Travail dans zones sécurisées",
        "Concevoir des mesures pour le travail en zones sécurisées.",
    ),
    ("7.7", "Bureau propre et écran vide", "Appliquer les règles du bureau propre et écran vide."),
    (
        "7.8",
        "Emplacement et protection du matériel",
        "Choisir un emplacement sécurisé pour le matériel.",
    ),
    ("7.9", "Sécurité des actifs hors site", "Protéger les actifs hors du site."),
    ("7.10", "Supports de stockage", "Gérer les supports de stockage sur leur cycle de vie."),
    ("7.11", "Services supports", "Protéger contre les coupures de courant et perturbations."),
    ("7.12", "Sécurité du câblage", "Protéger les câbles contre interceptions et dommages."),
    ("7.13", "Maintenance du matériel", "Entretenir correctement le matériel."),
    (
        "7.14",
        "Élimination sécurisée du matériel",
        "Supprimer les données avant élimination du matériel.",
    ),
    ("8.1", "Terminaux finaux des utilisateurs", "Protéger les informations sur les terminaux."),
    ("8.2", "Droits d'accès privilégiés", "Limiter et gérer les droits privilégiés."),
    ("8.3", "Restriction d'accès aux informations", "Restreindre l'accès selon la politique."),
    ("8.4", "Accès aux codes source", "Gérer l'accès au code source de manière appropriée."),
    ("8.5", "Authentification sécurisée", "Mettre en œuvre l'authentification sécurisée."),
    ("8.6", "Dimensionnement", "Surveiller et ajuster l'utilisation des ressources."),
    ("8.7", "Protection contre les malwares", "Protéger contre les programmes malveillants."),
    (
        "8.8",
        "Gestion des vulnérabilités techniques",
        "Obtenir et gérer les informations sur les vulnérabilités.",
    ),
    ("8.9", "Gestion des configurations", "Définir et surveiller les configurations de sécurité."),
    (
        "8.10",
        "Suppression des informations",
        "Supprimer les informations lorsqu'elles ne sont plus nécessaires.",
    ),
    ("8.11", "Masquage des données", "Utiliser le masquage des données selon la politique."),
    (
        "8.12",
        "Prévention de la fuite de données",
        "Appliquer des mesures de prévention de fuite de données.",
    ),
    ("8.13", "Sauvegarde des informations", "Conserver et tester des copies de sauvegarde."),
    (
        "8.14",
        "Redondance des moyens de traitement",
        "Mettre en œuvre la redondance pour la disponibilité.",
    ),
    ("8.15", "Journalisation", "Générer, conserver et analyser des journaux."),
    (
        "8.16",
        "Activités de surveillance",
        "Surveiller les systèmes pour détecter les comportements anormaux.",
    ),
    ("8.17", "Synchronisation des horloges", "Synchroniser les horloges des systèmes."),
    (
        "8.18",
        "Programmes utilitaires à privilèges",
        "Limiter l'utilisation des programmes utilitaires.",
    ),
    (
        "8.19",
        "Installation de logiciels",
        "Gérer l'installation de logiciels de manière sécurisée.",
    ),
    ("8.20", "Sécurité des réseaux", "Sécuriser, gérer et contrôler les réseaux."),
    ("8.21", "Sécurité des services réseau", "Identifier et surveiller les services réseau."),
    ("8.22", "Cloisonnement des réseaux", "Cloisonner les groupes de services dans les réseaux."),
    ("8.23", "Filtrage web", "Gérer l'accès aux sites web externes."),
    (
        "8.24",
        "Utilisation de la cryptographie",
        "Définir des règles pour l'utilisation de la cryptographie.",
    ),
    (
        "8.25",
        "Cycle de vie de développement sécurisé",
        "Définir des règles pour le développement sécurisé.",
    ),
    (
        "8.26",
        "Exigences de sécurité des applications",
        "Identifier les exigences lors du développement.",
    ),
    (
        "8.27",
        "Principes d'ingénierie sécurisée",
        "Établir des principes d'ingénierie des systèmes sécurisés.",
    ),
    ("8.28", "Codage sécurisé", "Appliquer des principes de codage sécurisé."),
    ("8.29", "Tests de sécurité", "Définir des processus de tests de sécurité."),
    ("8.30", "Développement externalisé", "Diriger et vérifier le développement externalisé."),
    (
        "8.31",
        "Séparation des environnements",
        "Séparer les environnements de développement, test et production.",
    ),
    ("8.32", "Gestion des changements", "Soumettre les changements à des procédures de gestion."),
    ("8.33", "Informations de test", "Sélectionner et protéger les informations de test."),
    (
        "8.34",
        "Protection pendant tests d'audit",
        "Planifier les tests d'audit des systèmes opérationnels.",
    ),
];

/// The Annex-A controls, all non conforming, in natural code order
pub fn annex_a() -> IsmsResult<Vec<NewControl>> {
    ANNEX_A
        .iter()
        .map(|(code, title, description)| {
            let code = ControlCode::new(code)?;
            let category = Category::for_code(&code)
                .ok_or_else(|| IsmsError::InvalidCategory(code.to_string()))?;
            Ok(NewControl::new(code, *title, category).with_description(*description))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_93_unique_controls() {
        let controls = annex_a().unwrap();
        assert_eq!(controls.len(), 93);
        let codes: HashSet<String> = controls.iter().map(|c| c.code.to_string()).collect();
        assert_eq!(codes.len(), 93);
    }

    #[test]
    fn test_catalog_theme_sizes() {
        let controls = annex_a().unwrap();
        let count = |category| controls.iter().filter(|c| c.category == category).count();
        assert_eq!(count(Category::Organisational), 37);
        assert_eq!(count(Category::Personnel), 8);
        assert_eq!(count(Category::Physical), 14);
        assert_eq!(count(Category::Technological), 34);
    }

    #[test]
    fn test_every_control_has_a_description() {
        let controls = annex_a().unwrap();
        assert!(controls.iter().all(|c| !c.description.trim().is_empty()));
        assert_eq!(
            controls[0].description,
            "Une politique de sécurité de l'information doit être définie, approuvée, publiée et communiquée."
        );
    }

    #[test]
    fn test_catalog_is_sorted() {
        let controls = annex_a().unwrap();
        assert!(controls.windows(2).all(|w| w[0].code < w[1].code));
    }
}
